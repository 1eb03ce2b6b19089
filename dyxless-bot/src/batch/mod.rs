//! Background processing of an uploaded INN file.
//!
//! A job reads the table, looks up every INN of the `Результат (ИНН)` column and writes two result
//! columns. Progress is checkpointed so a restarted bot continues where it stopped; interim files
//! are sent to the chat so paid lookups are never lost.

mod reporter;

use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use dbot_core::{Bot, Chat, DbotError, OutgoingMessage};
use dyxless_client::{LookupApi, QueryResponse, QueryType};
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio::time::{sleep, Instant};
use tracing::{error, info, instrument, warn};

use crate::checkpoint::{CachedLookup, Checkpoint, CheckpointError, CheckpointManager};
use crate::config::BatchConfig;
use crate::limiter::RateLimiter;
use crate::lookup::{extract_phones, format_full_result, is_inn};
use crate::session::ActiveTasks;
use crate::table::{read_table, write_table, write_xlsx, FileFormat, Table, TableError};
use crate::texts::{self, JobFigures};

pub use reporter::ProgressReporter;

pub const INN_COLUMN: &str = "Результат (ИНН)";
pub const PHONES_COLUMN: &str = "Телефоны";
pub const DETAILS_COLUMN: &str = "Всё";

pub const NO_BALANCE: &str = "нет денег на балансе";
pub const NOT_INN: &str = "это не ИНН";
pub const NO_PHONES: &str = "нет телефонов";
pub const NOTHING_FOUND: &str = "ничего не найдено";
pub const REQUEST_FAILED: &str = "ошибка при запросе";

#[derive(Error, Debug)]
pub enum BatchError {
    #[error("Не найдена колонка '{0}'")]
    MissingColumn(&'static str),

    #[error("не удалось прочитать файл: {0}")]
    Unreadable(TableError),

    #[error(transparent)]
    Table(#[from] TableError),

    #[error(transparent)]
    Checkpoint(#[from] CheckpointError),

    #[error(transparent)]
    Bot(#[from] DbotError),
}

impl BatchError {
    /// The input itself is unusable; resuming would fail the same way.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, BatchError::MissingColumn(_) | BatchError::Unreadable(_))
    }
}

/// Services shared by all file jobs.
pub struct JobContext {
    pub bot: Arc<dyn Bot>,
    pub api: Arc<dyn LookupApi>,
    pub limiter: Arc<RateLimiter>,
    pub checkpoints: Arc<CheckpointManager>,
    pub active_tasks: Arc<ActiveTasks>,
    pub batch: BatchConfig,
    pub price_per_request: u32,
    pub temp_dir: PathBuf,
}

impl JobContext {
    fn temp_file(&self, name: String) -> PathBuf {
        self.temp_dir.join(name)
    }

    pub fn partial_path(&self, id: &str) -> PathBuf {
        self.temp_file(format!("partial_{}.xlsx", id))
    }

    pub fn backup_path(&self, id: &str, processed: usize) -> PathBuf {
        self.temp_file(format!("backup_{}_{}.xlsx", id, processed))
    }

    pub fn result_path(&self, id: &str, format: FileFormat) -> PathBuf {
        self.temp_file(format!("result_{}.{}", id, format.extension()))
    }
}

/// Identity of a job: which file, whose, and under which checkpoint id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSpec {
    pub id: String,
    pub user_id: i64,
    pub chat_id: i64,
    pub file_name: String,
    pub input_path: PathBuf,
}

impl From<&Checkpoint> for JobSpec {
    fn from(cp: &Checkpoint) -> Self {
        Self {
            id: cp.id.clone(),
            user_id: cp.user_id,
            chat_id: cp.chat_id,
            file_name: cp.file_name.clone(),
            input_path: cp.input_path.clone(),
        }
    }
}

pub struct BatchJob {
    ctx: Arc<JobContext>,
    spec: JobSpec,
    chat: Chat,
}

impl BatchJob {
    pub fn new(ctx: Arc<JobContext>, spec: JobSpec) -> Self {
        let chat = Chat::private(spec.chat_id);
        Self { ctx, spec, chat }
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Runs the job to completion. Always clears the user's active-task entry.
    #[instrument(skip(self), fields(checkpoint_id = %self.spec.id, user_id = self.spec.user_id))]
    pub async fn run(self) {
        info!(file_name = %self.spec.file_name, "File job started");
        let reporter = ProgressReporter::new(self.ctx.bot.clone(), self.chat.clone());

        match self.execute(&reporter).await {
            Ok(()) => info!("File job finished"),
            Err(e) => {
                error!(error = %e, "File job failed");
                let text = match &e {
                    BatchError::MissingColumn(_) => texts::MISSING_INN_COLUMN.to_string(),
                    other => texts::job_failed(&other.to_string()),
                };
                if let Err(send_err) = self.ctx.bot.send_message(&self.chat, &text).await {
                    warn!(error = %send_err, "Failed to report job failure");
                }
                if e.is_invalid_input() {
                    if let Err(e) = self.ctx.checkpoints.delete(&self.spec.id) {
                        warn!(error = %e, "Failed to delete checkpoint");
                    }
                    remove_quietly(&self.spec.input_path);
                } else if matches!(self.ctx.checkpoints.load(&self.spec.id), Ok(None)) {
                    // Nothing would ever resume this input.
                    remove_quietly(&self.spec.input_path);
                }
            }
        }

        remove_quietly(&self.ctx.partial_path(&self.spec.id));
        for format in [FileFormat::Xlsx, FileFormat::Csv] {
            remove_quietly(&self.ctx.result_path(&self.spec.id, format));
        }
        self.ctx.active_tasks.clear(self.spec.user_id).await;
    }

    async fn execute(&self, reporter: &ProgressReporter) -> Result<(), BatchError> {
        let table = read_table(&self.spec.input_path).map_err(BatchError::Unreadable)?;
        let column = table
            .column_index(INN_COLUMN)
            .ok_or(BatchError::MissingColumn(INN_COLUMN))?;
        let inns = table.column_values(column);
        let total = inns.len();

        let mut cp = self.start_or_resume(&inns).await?;
        let started = Instant::now();
        let start_index = cp.processed;
        let mut last_progress = started;
        let mut last_backup: Option<PathBuf> = None;

        for inn in &inns[start_index..] {
            let (phones, details) = self.resolve(&mut cp, inn, reporter).await;
            cp.phones.push(phones);
            cp.details.push(details);
            cp.processed += 1;

            if cp.processed % self.ctx.batch.checkpoint_every == 0 {
                self.ctx.checkpoints.save(&cp)?;
                self.ctx
                    .checkpoints
                    .save_partial(&results_table(&table, &cp)?, &self.ctx.partial_path(&cp.id))?;
            }

            if cp.processed % self.ctx.batch.backup_every == 0 {
                self.send_backup(&table, &cp, total, &mut last_backup).await;
            }

            if last_progress.elapsed() >= self.ctx.batch.progress_interval() || cp.processed == total {
                let elapsed = started.elapsed();
                let done_here = (cp.processed - start_index) as u32;
                let remaining = if done_here > 0 {
                    elapsed / done_here * (total - cp.processed) as u32
                } else {
                    Duration::ZERO
                };
                let text = texts::progress(
                    &self.figures(&cp, total),
                    elapsed,
                    remaining,
                    &self.ctx.limiter.status(),
                );
                reporter.show(text).await;
                last_progress = Instant::now();
            }
        }

        self.ctx.checkpoints.save(&cp)?;
        self.finish(&table, &cp, total, started, reporter).await
    }

    /// Loads the job's checkpoint, or starts a fresh one and posts the file analysis.
    async fn start_or_resume(&self, inns: &[String]) -> Result<Checkpoint, BatchError> {
        let total = inns.len();
        match self.ctx.checkpoints.load(&self.spec.id)? {
            Some(cp) if is_consistent(&cp, total) => {
                info!(processed = cp.processed, total, "Resuming file job");
                self.ctx
                    .bot
                    .send_message(&self.chat, &texts::resuming(cp.processed, total))
                    .await?;
                return Ok(cp);
            }
            Some(cp) => warn!(
                processed = cp.processed,
                total,
                "Checkpoint does not match the file, starting over"
            ),
            None => {}
        }

        let cp = Checkpoint::new(
            self.spec.id.clone(),
            self.spec.user_id,
            self.spec.chat_id,
            self.spec.file_name.clone(),
            self.spec.input_path.clone(),
        );
        let unique: HashSet<&str> = inns.iter().map(String::as_str).filter(|s| is_inn(s)).collect();
        let analysis = texts::analysis(
            total,
            unique.len(),
            self.ctx.limiter.estimate(unique.len()),
            self.ctx.batch.checkpoint_every,
            self.ctx.batch.backup_every,
        );
        self.ctx.checkpoints.save(&cp)?;
        self.ctx
            .bot
            .send(&self.chat, OutgoingMessage::html(analysis))
            .await?;
        Ok(cp)
    }

    /// Phones and details for one row, updating the cache and balance flag.
    async fn resolve(&self, cp: &mut Checkpoint, inn: &str, reporter: &ProgressReporter) -> (String, String) {
        if cp.balance_exhausted {
            return same(NO_BALANCE);
        }
        if !is_inn(inn) {
            return same(NOT_INN);
        }
        if let Some(cached) = cp.cache.get(inn) {
            if cached.balance_error {
                cp.balance_exhausted = true;
                return same(NO_BALANCE);
            }
            return (cached.phones.clone(), cached.details.clone());
        }

        self.ctx.limiter.wait_if_needed(Some(reporter)).await;
        let result = self.ctx.api.lookup(inn, QueryType::Standard).await;
        sleep(self.ctx.batch.request_delay()).await;

        let balance_hit = match &result {
            Ok(resp) => mentions_insufficient_balance(resp),
            Err(e) => e.is_insufficient_balance(),
        };
        if balance_hit {
            warn!(inn, "Balance exhausted, remaining rows will be skipped");
            cp.balance_exhausted = true;
            cp.cache.insert(
                inn.to_string(),
                CachedLookup {
                    phones: NO_BALANCE.to_string(),
                    details: NO_BALANCE.to_string(),
                    balance_error: true,
                },
            );
            return same(NO_BALANCE);
        }

        match result {
            Ok(resp) => {
                let phones = non_empty_or(extract_phones(&resp), NO_PHONES);
                let details = non_empty_or(format_full_result(&resp), NOTHING_FOUND);
                cp.cache.insert(
                    inn.to_string(),
                    CachedLookup {
                        phones: phones.clone(),
                        details: details.clone(),
                        balance_error: false,
                    },
                );
                (phones, details)
            }
            Err(e) => {
                warn!(inn, error = %e, "Lookup failed");
                (REQUEST_FAILED.to_string(), format!("ошибка: {}", e))
            }
        }
    }

    /// Writes the rows processed so far to a backup file and sends it; failures are only logged.
    async fn send_backup(&self, table: &Table, cp: &Checkpoint, total: usize, last_backup: &mut Option<PathBuf>) {
        let path = self.ctx.backup_path(&cp.id, cp.processed);
        let caption = texts::backup_caption(cp.processed / self.ctx.batch.backup_every, &self.figures(cp, total));

        let sent: Result<(), BatchError> = async {
            write_xlsx(&results_table(table, cp)?, &path)?;
            self.ctx
                .bot
                .send_document(&self.chat, &path, OutgoingMessage::html(caption))
                .await?;
            Ok(())
        }
        .await;

        match sent {
            Ok(()) => {
                info!(processed = cp.processed, "Backup file sent");
                if let Some(previous) = last_backup.replace(path) {
                    remove_quietly(&previous);
                }
            }
            Err(e) => {
                error!(processed = cp.processed, error = %e, "Failed to send backup file");
                remove_quietly(&path);
            }
        }
    }

    async fn finish(
        &self,
        table: &Table,
        cp: &Checkpoint,
        total: usize,
        started: Instant,
        reporter: &ProgressReporter,
    ) -> Result<(), BatchError> {
        let format = FileFormat::from_file_name(&self.spec.file_name).unwrap_or(FileFormat::Xlsx);
        let output = self.ctx.result_path(&cp.id, format);
        write_table(&results_table(table, cp)?, &output, format)?;

        let caption = texts::final_caption(&self.figures(cp, total), started.elapsed());
        self.ctx
            .bot
            .send_document(&self.chat, &output, OutgoingMessage::html(caption))
            .await?;

        self.ctx.checkpoints.delete(&cp.id)?;
        reporter.clear().await;
        self.remove_backups(&cp.id);
        remove_quietly(&self.spec.input_path);
        Ok(())
    }

    fn remove_backups(&self, id: &str) {
        let prefix = format!("backup_{}_", id);
        let entries = match fs::read_dir(&self.ctx.temp_dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(error = %e, "Failed to list temp dir");
                return;
            }
        };
        for entry in entries.flatten() {
            if entry.file_name().to_string_lossy().starts_with(&prefix) {
                remove_quietly(&entry.path());
            }
        }
    }

    fn figures(&self, cp: &Checkpoint, total: usize) -> JobFigures {
        JobFigures {
            processed: cp.processed,
            total,
            unique_requests: cp.cache.len(),
            price_per_request: self.ctx.price_per_request,
        }
    }
}

/// Restarts every checkpointed job whose input file is still on disk. Returns how many were resumed.
pub async fn resume_pending(ctx: Arc<JobContext>) -> Result<usize, CheckpointError> {
    let mut resumed = 0;
    for cp in ctx.checkpoints.list_pending()? {
        if !cp.input_path.exists() {
            warn!(checkpoint_id = %cp.id, input = %cp.input_path.display(), "Input file is gone, dropping checkpoint");
            ctx.checkpoints.delete(&cp.id)?;
            continue;
        }
        if !ctx.active_tasks.try_register(cp.user_id, &cp.id).await {
            warn!(checkpoint_id = %cp.id, user_id = cp.user_id, "User already has an active job, skipping");
            continue;
        }
        info!(checkpoint_id = %cp.id, user_id = cp.user_id, processed = cp.processed, "Resuming pending job");
        BatchJob::new(ctx.clone(), JobSpec::from(&cp)).spawn();
        resumed += 1;
    }
    Ok(resumed)
}

/// Input rows plus the result columns for the rows processed so far. INNs are written as text so
/// spreadsheets keep every digit.
pub fn results_table(table: &Table, cp: &Checkpoint) -> Result<Table, TableError> {
    let mut out = table.head(cp.processed);
    if let Some(index) = out.column_index(INN_COLUMN) {
        out.column_to_text(index);
    }
    out.append_column(PHONES_COLUMN, &cp.phones)?;
    out.append_column(DETAILS_COLUMN, &cp.details)?;
    Ok(out)
}

fn is_consistent(cp: &Checkpoint, total: usize) -> bool {
    cp.processed <= total && cp.phones.len() == cp.processed && cp.details.len() == cp.processed
}

fn mentions_insufficient_balance(resp: &QueryResponse) -> bool {
    resp.message
        .as_deref()
        .is_some_and(|m| m.to_lowercase().contains("insufficient balance"))
}

fn same(label: &str) -> (String, String) {
    (label.to_string(), label.to_string())
}

fn non_empty_or(value: String, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value
    }
}

fn remove_quietly(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => warn!(path = %path.display(), error = %e, "Failed to remove file"),
    }
}
