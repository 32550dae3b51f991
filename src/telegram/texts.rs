//! User-visible message texts (Russian)

use crate::core::config;

/// Приветствие и перечень услуг сервиса.
pub const SERVICE_MENU: &str = "Здравствуйте! 👩‍⚕️\n\n\
    Вы обратились в Медицинский информационно-аналитический центр города Севастополя.\n\
    Наша система позволяет Вам удобно и быстро решить следующие задачи:\n\n\
    📌 Записаться на приём к врачу;\n\
    📌 Пройти профилактический медосмотр или диспансеризацию.\n\
    📌 Получать информацию по записям на приём к врачу.";

pub const PROMPT_FULL_NAME: &str = "Введите, пожалуйста, Ваше ФИО (Фамилия Имя Отчество):";

pub const BAD_FULL_NAME: &str = "Некорректное ФИО. Введите три слова: \
    Фамилия Имя Отчество, каждое с заглавной буквы (например: Иванов Иван Иванович).";

pub const PROMPT_PHONE: &str = "Введите номер телефона в формате +7XXXXXXXXXX:";

pub const BAD_PHONE: &str = "Некорректный номер. Введите номер в формате +7 и 10 цифр, \
    например +79781234567.";

pub const PROMPT_BIRTH_DATE: &str = "Введите дату рождения в формате ДД.ММ.ГГГГ:";

pub const BAD_BIRTH_DATE: &str = "Некорректная дата. Введите существующую дату в формате \
    ДД.ММ.ГГГГ, например 13.03.2003.";

pub const GENERIC_ERROR: &str = "Произошла ошибка. Пожалуйста, попробуйте позже.";

/// Уведомление о согласии на обработку персональных данных.
pub fn consent_notice() -> String {
    format!(
        "Продолжая, Вы даёте согласие на обработку персональных данных.\n\
         Ознакомиться с документом вы можете по ссылке {}",
        config::CONSENT_DOC_URL.as_str()
    )
}

/// Приветствие уже зарегистрированного пользователя.
pub fn registered_greeting(name: &str) -> String {
    format!("Здравствуйте, {}! Вы уже зарегистрированы.\n\n{}", name, SERVICE_MENU)
}

/// Подтверждение завершённой регистрации.
pub fn registration_done(name: &str) -> String {
    format!("Спасибо, {}! Регистрация завершена. ✅\n\n{}", name, SERVICE_MENU)
}

/// Отказ из-за уже зарегистрированного номера телефона.
pub fn duplicate_phone() -> String {
    let base = "Этот номер телефона уже зарегистрирован. \
        Регистрация прервана — для уточнения данных обратитесь к администратору";
    match *config::admin::ADMIN_CONTACT {
        Some(ref contact) => format!("{}: {}.", base, contact),
        None => format!("{}.", base),
    }
}
