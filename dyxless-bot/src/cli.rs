//! CLI parser, config loading, and the API diagnostic command.

use std::fmt::Write as _;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dyxless_client::{DyxlessClient, DyxlessError, ProbeReport};

use crate::config::{BotConfig, DyxlessConfig};

/// INN used by `probe` when none is given.
pub const DEFAULT_PROBE_QUERY: &str = "7736207543";

#[derive(Parser)]
#[command(name = "dyxless-bot")]
#[command(about = "Telegram bot for Dyxless INN lookups", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the Telegram bot (config from env; token can override TELEGRAM_TOKEN).
    Run {
        #[arg(short, long)]
        token: Option<String>,
    },
    /// Send one test request to the Dyxless API and print what came back.
    Probe {
        #[arg(short, long, default_value = DEFAULT_PROBE_QUERY)]
        query: String,
    },
}

/// Load BotConfig from environment. If `token` is provided it overrides TELEGRAM_TOKEN.
pub fn load_config(token: Option<String>) -> Result<BotConfig> {
    BotConfig::load(token)
}

/// Runs the diagnostic request and prints the report. Only DYXLESS_* variables are needed.
pub async fn run_probe(query: &str) -> Result<()> {
    let config = DyxlessConfig::from_env()?;
    config.validate()?;
    let client = DyxlessClient::new(config.api_token.clone(), config.api_url.clone(), config.timeout())
        .context("Failed to build Dyxless HTTP client")?;

    println!("🔍 Dyxless API diagnostics");
    println!("📡 URL: {}", client.base_url());
    println!("🔑 Token: {}", client.masked_token());
    println!("📦 Query: {}\n", query);

    match client.probe(query).await {
        Ok(report) => print!("{}", render_probe(&report)),
        Err(e) => print!("{}", render_probe_error(&e, config.timeout_secs)),
    }
    Ok(())
}

/// Human-readable report with advice for the well-known failure statuses.
pub fn render_probe(report: &ProbeReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "📊 HTTP status: {}", report.status);
    let _ = writeln!(out, "📋 Content-Type: {}", report.content_type.as_deref().unwrap_or("не указан"));
    let _ = writeln!(
        out,
        "📏 Content-Length: {}\n",
        report
            .content_length
            .map(|l| format!("{} bytes", l))
            .unwrap_or_else(|| "не указан".to_string())
    );
    let _ = writeln!(out, "📄 Response body:\n{}\n{}\n{}\n", "=".repeat(60), report.body_preview, "=".repeat(60));

    let advice: &[&str] = match report.status {
        200 => {
            let _ = writeln!(out, "✅ API работает");
            match &report.response {
                Some(resp) => {
                    let _ = writeln!(out, "🎯 Найдено записей: {}", resp.counts);
                    if !resp.data.is_empty() {
                        let _ = writeln!(out, "📦 Данные получены из {} источников", resp.data.len());
                    }
                }
                None => {
                    let _ = writeln!(out, "⚠️ Ответ не удалось разобрать как JSON");
                }
            }
            &[]
        }
        401 => {
            let _ = writeln!(out, "❌ 401: неправильный токен");
            &[
                "Откройте Telegram → @dyxless_bot",
                "Получите новый API токен",
                "Обновите переменную DYXLESS_API_TOKEN",
                "Перезапустите бота",
            ]
        }
        402 => {
            let _ = writeln!(out, "💰 402: недостаточно средств");
            &[
                "Откройте Telegram → @dyxless_bot",
                "Отправьте команду /balance",
                "Пополните баланс",
            ]
        }
        404 => {
            let _ = writeln!(out, "❌ 404: API endpoint не найден");
            &[
                "Возможно URL API изменился, проверьте DYXLESS_API_URL",
                "Свяжитесь с поддержкой @dyxless_bot",
            ]
        }
        429 => {
            let _ = writeln!(out, "⏱️ 429: превышен лимит запросов");
            &["Подождите 16 минут", "Лимит: 100 запросов за 15 минут"]
        }
        other => {
            let _ = writeln!(out, "⚠️ Неизвестная ошибка: HTTP {}", other);
            &["Отправьте этот вывод в поддержку"]
        }
    };
    push_advice(&mut out, advice);
    out
}

pub fn render_probe_error(err: &DyxlessError, timeout_secs: u64) -> String {
    let mut out = String::new();
    match err {
        DyxlessError::Transport(e) if e.is_timeout() => {
            let _ = writeln!(out, "⏱️ Таймаут: API не ответил за {} секунд", timeout_secs);
            push_advice(&mut out, &["Повторите попытку", "Если повторяется, сервис перегружен"]);
        }
        DyxlessError::Transport(e) => {
            let _ = writeln!(out, "❌ Ошибка соединения: {}", e);
            push_advice(
                &mut out,
                &[
                    "Проверьте интернет-соединение",
                    "Проверьте доступность домена api-dyxless.cfd",
                    "Возможно сервис временно недоступен",
                ],
            );
        }
        other => {
            let _ = writeln!(out, "❌ Неожиданная ошибка: {}", other);
        }
    }
    out
}

fn push_advice(out: &mut String, steps: &[&str]) {
    if steps.is_empty() {
        return;
    }
    let _ = writeln!(out, "\n🔧 Что делать:");
    for (i, step) in steps.iter().enumerate() {
        let _ = writeln!(out, "   {}. {}", i + 1, step);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn report(status: u16) -> ProbeReport {
        ProbeReport {
            status,
            content_type: Some("application/json".to_string()),
            content_length: None,
            body_preview: "{}".to_string(),
            response: None,
        }
    }

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_probe_default_query() {
        let cli = Cli::parse_from(["dyxless-bot", "probe"]);
        match cli.command {
            Commands::Probe { query } => assert_eq!(query, DEFAULT_PROBE_QUERY),
            _ => panic!("expected probe"),
        }
        let cli = Cli::parse_from(["dyxless-bot", "run", "--token", "t"]);
        assert!(matches!(cli.command, Commands::Run { token: Some(t) } if t == "t"));
    }

    #[test]
    fn test_render_probe_advice() {
        let text = render_probe(&report(402));
        assert!(text.contains("402: недостаточно средств"));
        assert!(text.contains("2. Отправьте команду /balance"));
        assert!(text.contains("Content-Length: не указан"));

        assert!(render_probe(&report(401)).contains("DYXLESS_API_TOKEN"));
        assert!(render_probe(&report(503)).contains("HTTP 503"));
        assert!(!render_probe(&report(200)).contains("Что делать"));
    }
}
