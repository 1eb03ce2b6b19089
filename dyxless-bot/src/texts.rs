//! User-facing texts (Russian, Telegram HTML).

use std::time::Duration;

use dyxless_client::{DyxlessError, QueryType};

use crate::limiter::{LimitStatus, PauseEvent};
use crate::progress::{format_duration, progress_bar};

pub const WELCOME: &str = "👋 <b>Добро пожаловать в Dyxless Search Bot!</b>\n\n\
📊 <b>Поиск по файлу с ИНН</b> - до 10 000+ контактов\n\
🔍 <b>Одиночный поиск</b> - быстрый поиск\n\
📈 <b>Статус лимита API</b> - мониторинг\n\n\
✨ <b>Защита ваших денег:</b>\n\
💾 Автосохранение каждые 50 запросов\n\
📤 Отправка файла в чат каждые 100 запросов\n\
♻️ Возобновление после сбоя\n\
🔒 Фоновая обработка без потерь\n\n\
⚠️ <b>Лимит API:</b> 100 запросов / 15 мин\n\
Выберите действие:";

pub const MAIN_MENU: &str = "📋 Главное меню:";

pub const HELP: &str = "📖 <b>Инструкция:</b>\n\n\
<b>📊 Поиск по файлу с ИНН:</b>\n\
• Поддержка до 10 000+ контактов\n\
• 💾 Автосохранение каждые 50 запросов\n\
• 📤 Отправка файла каждые 100 запросов\n\
• ♻️ Возобновление после сбоя\n\
• 🚀 Фоновая обработка\n\n\
<b>💰 Защита ваших денег:</b>\n\
• Каждый запрос = 2₽\n\
• Файлы сохраняются в чат каждые 100 запросов\n\
• При сбое - не теряете оплаченные запросы\n\
• Все промежуточные результаты у вас в чате\n\n\
<b>🔍 Одиночный поиск:</b>\n\
• Стандартный: телефон, email, ИНН (2₽)\n\
• Telegram: @username или ID (10₽)\n\n\
<b>⚠️ Лимиты API:</b>\n\
• 100 запросов / 15 минут\n\
• Пауза 16 минут при превышении\n\
• Автоматическое продолжение\n\n\
Используйте /start для меню";

pub const FILE_INSTRUCTIONS: &str = "📊 <b>Поиск по файлу с ИНН</b>\n\n\
<b>Формат:</b>\n\
• Excel (.xlsx) или CSV (.csv)\n\
• Колонка: <code>Результат (ИНН)</code>\n\n\
<b>💰 Защита ваших денег:</b>\n\
• 📤 Файл отправляется в чат каждые 100 запросов\n\
• 💾 Автосохранение каждые 50 запросов\n\
• 🔒 При сбое - не теряете оплаченные запросы\n\
• ♻️ Можно перезапустить с любого места\n\n\
<b>✨ Возможности:</b>\n\
• До 10 000+ контактов\n\
• Фоновая обработка\n\
• Безопасный перезапуск\n\n\
⏱️ <b>Примерное время:</b>\n\
• 100 контактов: ~2 минуты\n\
• 1000 контактов: ~3 часа\n\
• 10000 контактов: ~29 часов\n\n\
📤 Отправьте файл\n\
/cancel для отмены";

pub const CHECK_BALANCE: &str = "💰 Для проверки баланса используйте /balance в @dyxless_bot";

pub const TASK_ALREADY_ACTIVE: &str = "⚠️ У вас уже есть активная задача обработки.\n\
Дождитесь её завершения или перезапустите бота.";
pub const UNSUPPORTED_FILE: &str = "❌ Поддерживаются только .xlsx и .csv";
pub const FILE_RECEIVED: &str = "📥 Файл получен. Запускаю фоновую обработку...";
pub const JOB_STARTED: &str = "✅ Обработка запущена в фоновом режиме.\n\
Вы можете использовать бота для других задач.";
pub const SEND_FILE_PROMPT: &str = "📤 Отправьте файл .xlsx или .csv\n/cancel для отмены";

pub const CHOOSE_QUERY_TYPE: &str = "🔍 Выберите тип:";
pub const SEARCHING: &str = "🔍 Поиск...";
pub const WHAT_NEXT: &str = "Что дальше?";
pub const EMPTY_QUERY: &str = "Введите текст запроса\n/cancel для отмены";

pub const NOTHING_TO_CANCEL: &str = "Нечего отменять";
pub const CANCELLED: &str = "❌ Отменено";
pub const ACCESS_DENIED: &str = "⛔ Доступ запрещён";

pub const MISSING_INN_COLUMN: &str = "❌ Не найдена колонка 'Результат (ИНН)'";

/// Prompt after a query type was chosen.
pub fn query_prompt(query_type: QueryType) -> &'static str {
    match query_type {
        QueryType::Standard => {
            "📱 <b>Стандартный поиск (2₽)</b>\n\nВведите: телефон, email, ИНН, имя\n/cancel для отмены"
        }
        QueryType::Telegram => "💬 <b>Telegram поиск (10₽)</b>\n\nВведите: @username или ID\n/cancel для отмены",
    }
}

pub fn limit_status(status: &LimitStatus) -> String {
    let mut text = format!(
        "📈 <b>Статус лимита API:</b>\n\n\
         ✅ Использовано: <b>{}</b>\n\
         🔄 Осталось: <b>{}</b>\n\
         📊 Максимум: <b>{}</b>\n\n",
        status.used, status.remaining, status.max_calls
    );
    if status.is_paused() && status.next_reset_minutes > 0.0 {
        text.push_str(&format!("⏰ Сброс через: <b>{:.1} мин</b>\n", status.next_reset_minutes));
    } else if status.used > 0 {
        text.push_str("✅ Лимит активен\n");
    } else {
        text.push_str("🟢 Лимит не использован\n");
    }
    text.push_str(&format!("\n⏱️ Время цикла: {}", format_duration(status.cycle_time)));
    text
}

/// Status line shown while the rate limiter pauses a job.
pub fn pause_event(event: &PauseEvent) -> String {
    match event {
        PauseEvent::Started { max_calls, remaining } => {
            let secs = remaining.as_secs();
            format!(
                "⏸️ Достигнут лимит API ({} запросов).\n\
                 ⏳ Пауза на {} минут {} секунд...\n\
                 Обработка продолжится автоматически.",
                max_calls,
                secs / 60,
                secs % 60
            )
        }
        PauseEvent::Waiting { remaining } => {
            let secs = remaining.as_secs();
            format!("⏳ Осталось ждать: {} мин {} сек...", secs / 60, secs % 60)
        }
        PauseEvent::Finished => "✅ Лимит сброшен, обработка продолжается...".to_string(),
    }
}

pub fn resuming(position: usize, total: usize) -> String {
    format!("♻️ Возобновляю обработку с позиции {}/{}", position, total)
}

pub fn analysis(total_rows: usize, unique_inns: usize, estimate: Duration, checkpoint_every: usize, backup_every: usize) -> String {
    format!(
        "📊 <b>Анализ файла:</b>\n\n\
         • Всего строк: <b>{}</b>\n\
         • Уникальных ИНН: <b>{}</b>\n\
         • Примерное время: <b>{}</b>\n\n\
         ⚙️ <b>Особенности обработки:</b>\n\
         • Автосохранение каждые {} запросов\n\
         • 💾 Отправка файла в чат каждые {} запросов\n\
         • Можно безопасно перезапустить бота\n\
         • Все промежуточные файлы сохранены в чате\n\n\
         ⏳ Начинаю обработку...\n\
         Вы будете получать обновления прогресса.",
        total_rows,
        unique_inns,
        format_duration(estimate),
        checkpoint_every,
        backup_every
    )
}

/// Numbers shown in progress messages and captions.
#[derive(Debug, Clone, Copy)]
pub struct JobFigures {
    pub processed: usize,
    pub total: usize,
    pub unique_requests: usize,
    pub price_per_request: u32,
}

impl JobFigures {
    fn cost(&self) -> String {
        format!(
            "{} × {}₽ = {}₽",
            self.unique_requests,
            self.price_per_request,
            self.unique_requests as u64 * u64::from(self.price_per_request)
        )
    }
}

pub fn progress(figures: &JobFigures, elapsed: Duration, remaining: Duration, limit: &LimitStatus) -> String {
    let percent = if figures.total == 0 {
        100.0
    } else {
        figures.processed as f64 / figures.total as f64 * 100.0
    };
    format!(
        "📊 <b>Прогресс обработки:</b>\n\n\
         {}\n\
         📈 Обработано: <b>{}/{}</b> ({:.1}%)\n\
         🔍 Уникальных запросов: <b>{}</b>\n\n\
         ⏱️ Затрачено: <b>{}</b>\n\
         ⏳ Осталось: <b>{}</b>\n\n\
         📡 <b>Лимит API:</b>\n\
         • Использовано: {}/{}\n\
         • Осталось: {}\n\n\
         💾 Автосохранение активно",
        progress_bar(figures.processed, figures.total),
        figures.processed,
        figures.total,
        percent,
        figures.unique_requests,
        format_duration(elapsed),
        format_duration(remaining),
        limit.used,
        limit.max_calls,
        limit.remaining
    )
}

pub fn backup_caption(number: usize, figures: &JobFigures) -> String {
    format!(
        "💾 <b>Автосохранение #{}</b>\n\n\
         📊 Обработано: <b>{}/{}</b>\n\
         🔍 Уникальных запросов: <b>{}</b>\n\
         💰 Оплачено запросов: <b>{}</b>\n\n\
         ✅ Файл сохранён в чате!\n\
         ⚡ Обработка продолжается...",
        number,
        figures.processed,
        figures.total,
        figures.unique_requests,
        figures.cost()
    )
}

pub fn final_caption(figures: &JobFigures, total_time: Duration) -> String {
    format!(
        "✅ <b>Обработка завершена!</b>\n\n\
         📊 Всего строк: <b>{}</b>\n\
         ✅ Обработано: <b>{}</b>\n\
         💾 Уникальных запросов: <b>{}</b>\n\
         💰 Общая стоимость: <b>{}</b>\n\
         ⏱️ Общее время: <b>{}</b>\n\n\
         📥 ФИНАЛЬНЫЙ результат в файле ниже ⬇️",
        figures.total,
        figures.processed,
        figures.unique_requests,
        figures.cost(),
        format_duration(total_time)
    )
}

pub fn job_failed(reason: &str) -> String {
    format!("⚠️ Ошибка: {}", reason)
}

/// Short reason for a failed single lookup.
pub fn lookup_error(err: &DyxlessError) -> String {
    match err {
        DyxlessError::InsufficientBalance => "Недостаточно средств на балансе".to_string(),
        DyxlessError::Unauthorized => "Неверный токен API".to_string(),
        DyxlessError::NotFound => "API endpoint не найден".to_string(),
        DyxlessError::RateLimited => "Слишком много запросов, попробуйте позже".to_string(),
        DyxlessError::Http { status } => format!("HTTP ошибка: {}", status),
        DyxlessError::Transport(e) => format!("Ошибка соединения: {}", e),
        DyxlessError::Decode(_) => "Некорректный ответ API".to_string(),
    }
}
