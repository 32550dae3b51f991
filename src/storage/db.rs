use chrono::Local;
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::ErrorCode;
use thiserror::Error;

use crate::storage::migrations::run_migrations;

/// Фамилия Имя Отчество обращение по умолчанию, когда пользователь не найден.
pub const GUEST_GREETING: &str = "гость";

/// Структура, представляющая зарегистрированного пользователя.
///
/// Запись неизменяема после создания: путь обновления отсутствует.
#[derive(Debug, Clone)]
pub struct UserRecord {
    /// Идентификатор чата (первичный ключ)
    pub chat_id: String,
    /// ФИО пользователя ("Фамилия Имя Отчество")
    pub full_name: String,
    /// Номер телефона (+7XXXXXXXXXX, уникальный)
    pub phone: String,
    /// Дата рождения (ДД.ММ.ГГГГ); отсутствует у записей, созданных
    /// до ввода этого поля
    pub birth_date: Option<String>,
    /// Дата регистрации, назначается сервером при вставке
    pub registration_date: String,
}

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConnection = PooledConnection<SqliteConnectionManager>;

/// Registration insert failure
#[derive(Debug, Error)]
pub enum RegisterError {
    /// The chat or the phone number is already registered
    #[error("chat or phone is already registered")]
    Duplicate,
    /// Any other storage-layer failure
    #[error(transparent)]
    Storage(rusqlite::Error),
}

/// Create a new database connection pool
///
/// Initializes a connection pool with up to 10 connections and runs schema
/// migrations. A migration failure is fatal: the handlers cannot operate
/// against a missing schema.
///
/// # Arguments
///
/// * `database_path` - Path to SQLite database file
pub fn create_pool(database_path: &str) -> anyhow::Result<DbPool> {
    let manager = SqliteConnectionManager::file(database_path);
    let pool = Pool::builder()
        .max_size(10) // Maximum 10 connections in the pool
        .build(manager)?;

    let mut conn = pool.get()?;
    run_migrations(&mut conn)?;

    Ok(pool)
}

/// Get a connection from the pool
///
/// The connection is automatically returned to the pool when dropped, so
/// no operation can leak a held connection on any exit path.
pub fn get_connection(pool: &DbPool) -> Result<DbConnection, r2d2::Error> {
    pool.get()
}

/// Проверяет, есть ли запись для данного чата.
fn user_exists(conn: &DbConnection, chat_id: &str) -> rusqlite::Result<bool> {
    let mut stmt = conn.prepare("SELECT 1 FROM users WHERE chat_id = ?")?;
    stmt.exists([chat_id])
}

/// Получает ФИО пользователя по идентификатору чата.
fn get_full_name(conn: &DbConnection, chat_id: &str) -> rusqlite::Result<Option<String>> {
    let mut stmt = conn.prepare("SELECT full_name FROM users WHERE chat_id = ?")?;
    let mut rows = stmt.query([chat_id])?;

    match rows.next()? {
        Some(row) => Ok(Some(row.get(0)?)),
        None => Ok(None),
    }
}

/// Получает полную запись пользователя по идентификатору чата.
///
/// # Returns
///
/// Возвращает `Ok(Some(UserRecord))` если пользователь найден, `Ok(None)`
/// если не найден, или ошибку базы данных.
pub fn get_user(conn: &DbConnection, chat_id: &str) -> rusqlite::Result<Option<UserRecord>> {
    let mut stmt = conn.prepare(
        "SELECT chat_id, full_name, phone, birth_date, registration_date FROM users WHERE chat_id = ?",
    )?;
    let mut rows = stmt.query([chat_id])?;

    match rows.next()? {
        Some(row) => Ok(Some(UserRecord {
            chat_id: row.get(0)?,
            full_name: row.get(1)?,
            phone: row.get(2)?,
            birth_date: row.get(3)?,
            registration_date: row.get(4)?,
        })),
        None => Ok(None),
    }
}

/// Вставляет новую запись регистрации.
///
/// `registration_date` назначается здесь, на стороне сервера. Нарушение
/// уникальности `chat_id` или `phone` возвращается как
/// [`RegisterError::Duplicate`].
pub fn try_register(
    conn: &DbConnection,
    chat_id: &str,
    full_name: &str,
    phone: &str,
    birth_date: &str,
) -> Result<(), RegisterError> {
    let registration_date = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();

    let result = conn.execute(
        "INSERT INTO users (chat_id, full_name, phone, birth_date, registration_date)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        [chat_id, full_name, phone, birth_date, registration_date.as_str()],
    );

    match result {
        Ok(_) => Ok(()),
        Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
            Err(RegisterError::Duplicate)
        }
        Err(e) => Err(RegisterError::Storage(e)),
    }
}

/// Outcome of a [`register`] call, distinguishing the recoverable
/// duplicate case from a storage fault so the user message can differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterOutcome {
    /// Запись создана
    Registered,
    /// Чат или телефон уже зарегистрированы
    Duplicate,
    /// Ошибка хранилища, регистрация не выполнена
    Failed,
}

/// Проверяет, зарегистрирован ли чат.
///
/// При ошибке хранилища отвечает `false` ("не зарегистрирован"), чтобы не
/// ронять диалог; сама ошибка пишется в лог, чтобы сбой не прошёл
/// незамеченным для операторов.
pub fn is_registered(pool: &DbPool, chat_id: i64) -> bool {
    let key = chat_id.to_string();
    let conn = match get_connection(pool) {
        Ok(conn) => conn,
        Err(e) => {
            log::error!("storage fault, failing open to not-registered for chat {}: {}", chat_id, e);
            return false;
        }
    };

    match user_exists(&conn, &key) {
        Ok(exists) => exists,
        Err(e) => {
            log::error!("storage fault, failing open to not-registered for chat {}: {}", chat_id, e);
            false
        }
    }
}

/// Возвращает обращение к пользователю: имя и отчество из сохранённого
/// ФИО, либо "гость", если записи нет или хранилище недоступно.
pub fn greeting_name(pool: &DbPool, chat_id: i64) -> String {
    let key = chat_id.to_string();
    let conn = match get_connection(pool) {
        Ok(conn) => conn,
        Err(e) => {
            log::error!("storage fault, falling back to guest greeting for chat {}: {}", chat_id, e);
            return GUEST_GREETING.to_string();
        }
    };

    match get_full_name(&conn, &key) {
        Ok(Some(full_name)) => greeting_from_full_name(&full_name),
        Ok(None) => GUEST_GREETING.to_string(),
        Err(e) => {
            log::error!("storage fault, falling back to guest greeting for chat {}: {}", chat_id, e);
            GUEST_GREETING.to_string()
        }
    }
}

/// Извлекает обращение из ФИО: все слова, кроме фамилии ("Иванов Иван
/// Иванович" -> "Иван Иванович"), либо единственное слово целиком.
pub fn greeting_from_full_name(full_name: &str) -> String {
    let tokens: Vec<&str> = full_name.split_whitespace().collect();
    match tokens.as_slice() {
        [] => GUEST_GREETING.to_string(),
        [single] => (*single).to_string(),
        [_, rest @ ..] => rest.join(" "),
    }
}

/// Регистрирует пользователя.
///
/// Всегда возвращает исход, никогда не паникует и не пробрасывает ошибку:
/// нарушение уникальности и сбой хранилища различимы для вызывающего,
/// поскольку пользователю показываются разные сообщения.
pub fn register(pool: &DbPool, chat_id: i64, full_name: &str, phone: &str, birth_date: &str) -> RegisterOutcome {
    let key = chat_id.to_string();
    let conn = match get_connection(pool) {
        Ok(conn) => conn,
        Err(e) => {
            log::error!("storage fault, registration not completed for chat {}: {}", chat_id, e);
            return RegisterOutcome::Failed;
        }
    };

    match try_register(&conn, &key, full_name, phone, birth_date) {
        Ok(()) => {
            log::info!("Registered chat {}", chat_id);
            RegisterOutcome::Registered
        }
        Err(RegisterError::Duplicate) => {
            log::warn!("Duplicate registration attempt for chat {}", chat_id);
            RegisterOutcome::Duplicate
        }
        Err(RegisterError::Storage(e)) => {
            log::error!("storage fault, registration not completed for chat {}: {}", chat_id, e);
            RegisterOutcome::Failed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    fn test_pool() -> (TempDir, DbPool) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("users.sqlite");
        let pool = create_pool(path.to_str().unwrap()).unwrap();
        (dir, pool)
    }

    #[test]
    fn test_register_and_is_registered() {
        let (_dir, pool) = test_pool();

        assert!(!is_registered(&pool, 100));
        assert_eq!(
            register(&pool, 100, "Иванов Иван Иванович", "+79781234567", "13.03.2003"),
            RegisterOutcome::Registered
        );
        assert!(is_registered(&pool, 100));
        assert!(!is_registered(&pool, 101));
    }

    #[test]
    fn test_duplicate_phone_leaves_single_row() {
        let (_dir, pool) = test_pool();

        assert_eq!(
            register(&pool, 1, "Иванов Иван Иванович", "+79781234567", "13.03.2003"),
            RegisterOutcome::Registered
        );
        // Same phone from a different chat must be rejected
        assert_eq!(
            register(&pool, 2, "Петров Пётр Петрович", "+79781234567", "01.01.1990"),
            RegisterOutcome::Duplicate
        );

        let conn = get_connection(&pool).unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM users WHERE phone = '+79781234567'", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(count, 1);
        assert!(!is_registered(&pool, 2));
    }

    #[test]
    fn test_duplicate_chat_id_rejected() {
        let (_dir, pool) = test_pool();

        assert_eq!(
            register(&pool, 1, "Иванов Иван Иванович", "+79781234567", "13.03.2003"),
            RegisterOutcome::Registered
        );
        assert_eq!(
            register(&pool, 1, "Иванов Иван Иванович", "+79780000000", "13.03.2003"),
            RegisterOutcome::Duplicate
        );
    }

    #[test]
    fn test_greeting_name() {
        let (_dir, pool) = test_pool();

        register(&pool, 7, "Иванов Иван Иванович", "+79781234567", "13.03.2003");
        assert_eq!(greeting_name(&pool, 7), "Иван Иванович");

        // Unregistered chat falls back to the guest greeting
        assert_eq!(greeting_name(&pool, 8), GUEST_GREETING);
    }

    #[test]
    fn test_greeting_from_full_name() {
        assert_eq!(greeting_from_full_name("Иванов Иван Иванович"), "Иван Иванович");
        assert_eq!(greeting_from_full_name("Мадонна"), "Мадонна");
        assert_eq!(greeting_from_full_name(""), GUEST_GREETING);
    }

    #[test]
    fn test_reads_fail_closed_on_storage_fault() {
        let (_dir, pool) = test_pool();

        register(&pool, 1, "Иванов Иван Иванович", "+79781234567", "13.03.2003");

        // Break the store underneath the pool
        let conn = get_connection(&pool).unwrap();
        conn.execute_batch("DROP TABLE users").unwrap();
        drop(conn);

        // Reads fall back to safe defaults instead of propagating the fault
        assert!(!is_registered(&pool, 1));
        assert_eq!(greeting_name(&pool, 1), GUEST_GREETING);
    }

    #[test]
    fn test_register_fails_closed_on_storage_fault() {
        let (_dir, pool) = test_pool();

        let conn = get_connection(&pool).unwrap();
        conn.execute_batch("DROP TABLE users").unwrap();
        drop(conn);

        assert_eq!(
            register(&pool, 1, "Иванов Иван Иванович", "+79781234567", "13.03.2003"),
            RegisterOutcome::Failed
        );
    }

    #[test]
    fn test_registration_date_is_assigned() {
        let (_dir, pool) = test_pool();

        register(&pool, 5, "Иванов Иван Иванович", "+79781234567", "13.03.2003");

        let conn = get_connection(&pool).unwrap();
        let record = get_user(&conn, "5").unwrap().unwrap();
        assert_eq!(record.full_name, "Иванов Иван Иванович");
        assert_eq!(record.birth_date.as_deref(), Some("13.03.2003"));
        assert!(!record.registration_date.is_empty());
    }
}
