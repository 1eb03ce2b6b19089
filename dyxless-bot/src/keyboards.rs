//! Inline keyboards and their callback data.

use dbot_core::{InlineButton, InlineKeyboard};

pub const SEARCH_FILE_INN: &str = "search_file_inn";
pub const SINGLE_SEARCH: &str = "single_search";
pub const CHECK_LIMIT: &str = "check_limit";
pub const CHECK_BALANCE: &str = "check_balance";
pub const HELP: &str = "help";
pub const BACK_TO_MENU: &str = "back_to_menu";
/// Prefix of query type callbacks: `type_standart`, `type_telegram`.
pub const TYPE_PREFIX: &str = "type_";

/// Full menu shown with the welcome text.
pub fn start_menu() -> InlineKeyboard {
    InlineKeyboard::single_column([
        InlineButton::new("📊 Поиск по файлу с ИНН", SEARCH_FILE_INN),
        InlineButton::new("🔍 Одиночный поиск", SINGLE_SEARCH),
        InlineButton::new("📈 Статус лимита API", CHECK_LIMIT),
        InlineButton::new("💰 Проверить баланс", CHECK_BALANCE),
        InlineButton::new("ℹ️ Помощь", HELP),
    ])
}

/// Compact menu shown on `back_to_menu`.
pub fn main_menu() -> InlineKeyboard {
    InlineKeyboard::single_column([
        InlineButton::new("📊 Поиск по файлу", SEARCH_FILE_INN),
        InlineButton::new("🔍 Одиночный поиск", SINGLE_SEARCH),
        InlineButton::new("📈 Статус API", CHECK_LIMIT),
        InlineButton::new("💰 Баланс", CHECK_BALANCE),
        InlineButton::new("ℹ️ Помощь", HELP),
    ])
}

pub fn query_types() -> InlineKeyboard {
    InlineKeyboard::single_column([
        InlineButton::new("📱 Стандартный (2₽)", format!("{}standart", TYPE_PREFIX)),
        InlineButton::new("💬 Telegram (10₽)", format!("{}telegram", TYPE_PREFIX)),
        InlineButton::new("◀️ Назад", BACK_TO_MENU),
    ])
}

pub fn after_search() -> InlineKeyboard {
    InlineKeyboard::single_column([
        InlineButton::new("🔍 Новый поиск", SINGLE_SEARCH),
        InlineButton::new("◀️ Меню", BACK_TO_MENU),
    ])
}

pub fn back_to_menu(label: &str) -> InlineKeyboard {
    InlineKeyboard::single_column([InlineButton::new(label, BACK_TO_MENU)])
}
