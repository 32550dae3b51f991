//! In-memory conversation state for registrations in progress
//!
//! The tracker exclusively owns conversation state. It is process-local and
//! empty at startup: registrations that were mid-flow before a restart are
//! lost and the user has to send /start again.

use dashmap::DashMap;

/// Состояние диалога регистрации для одного чата.
///
/// Каждый вариант несёт уже собранные и проверенные поля, поэтому
/// "телефон без ФИО" непредставим.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationState {
    /// Ожидается ФИО
    WaitingFullName,
    /// Ожидается номер телефона
    WaitingPhone { full_name: String },
    /// Ожидается дата рождения
    WaitingBirthDate { full_name: String, phone: String },
}

/// Отображение `chat_id -> RegistrationState` для чатов, находящихся в
/// процессе регистрации.
#[derive(Debug, Default)]
pub struct RegistrationTracker {
    states: DashMap<i64, RegistrationState>,
}

impl RegistrationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Текущее состояние чата, если регистрация идёт.
    pub fn get(&self, chat_id: i64) -> Option<RegistrationState> {
        self.states.get(&chat_id).map(|entry| entry.value().clone())
    }

    /// Создаёт или заменяет состояние чата.
    pub fn set(&self, chat_id: i64, state: RegistrationState) {
        self.states.insert(chat_id, state);
    }

    /// Удаляет состояние чата (успешное завершение или невосстановимый
    /// сбой — пользователь начинает заново с /start).
    pub fn clear(&self, chat_id: i64) {
        self.states.remove(&chat_id);
    }

    /// Идёт ли в чате регистрация.
    pub fn is_active(&self, chat_id: i64) -> bool {
        self.states.contains_key(&chat_id)
    }

    /// Количество незавершённых регистраций.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracker_starts_empty() {
        let tracker = RegistrationTracker::new();
        assert!(tracker.is_empty());
        assert_eq!(tracker.get(1), None);
        assert!(!tracker.is_active(1));
    }

    #[test]
    fn test_tracker_lifecycle() {
        let tracker = RegistrationTracker::new();

        tracker.set(1, RegistrationState::WaitingFullName);
        assert!(tracker.is_active(1));
        assert_eq!(tracker.get(1), Some(RegistrationState::WaitingFullName));

        tracker.set(
            1,
            RegistrationState::WaitingPhone {
                full_name: "Иванов Иван Иванович".to_string(),
            },
        );
        assert_eq!(
            tracker.get(1),
            Some(RegistrationState::WaitingPhone {
                full_name: "Иванов Иван Иванович".to_string(),
            })
        );

        tracker.clear(1);
        assert!(!tracker.is_active(1));
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_tracker_isolates_chats() {
        let tracker = RegistrationTracker::new();

        tracker.set(1, RegistrationState::WaitingFullName);
        tracker.set(
            2,
            RegistrationState::WaitingBirthDate {
                full_name: "Петров Пётр Петрович".to_string(),
                phone: "+79780000000".to_string(),
            },
        );

        tracker.clear(1);
        assert!(!tracker.is_active(1));
        assert!(tracker.is_active(2));
        assert_eq!(tracker.len(), 1);
    }
}
