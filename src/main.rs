use anyhow::Result;
use clap::Parser;
use tokio::signal;
use tracing::{error, info, warn};
mod config;
mod error;
mod events;
mod services;
mod utils;

use config::Config;
use services::{create_window_source, scan_windows, MonitorLoop, WindowClassifier};

#[derive(Parser, Debug)]
#[command(name = "toastpos")]
#[command(about = "Перемещает всплывающие уведомления в правый верхний угол экрана")]
struct Args {
    /// Путь к файлу конфигурации
    #[arg(short, long, default_value = "toastpos.toml")]
    config: String,

    /// Режим сухого запуска (эмулированный рабочий стол вместо настоящих окон)
    #[arg(long)]
    dry_run: bool,

    /// Уровень логирования (переопределяет значение из конфигурации)
    #[arg(long)]
    log_level: Option<String>,

    /// Один раз вывести найденные окна с вердиктом классификатора и выйти
    #[arg(long)]
    scan: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Загрузка конфигурации
    let config = Config::load(&args.config)?;

    // Инициализация системы логирования
    let level = args.log_level.as_deref().unwrap_or(&config.logging.level);
    init_tracing(level, &config.logging.format)?;

    info!("Запуск toastpos v{}", env!("CARGO_PKG_VERSION"));
    info!("Конфигурация загружена из: {}", args.config);

    if args.dry_run {
        warn!("Режим сухого запуска - реальные окна не перемещаются");
    }

    let source = create_window_source(args.dry_run)?;

    if args.scan {
        let classifier = WindowClassifier::new(config.classifier.clone());
        scan_windows(source.as_ref(), &classifier)?.log();
        return Ok(());
    }

    let monitor = MonitorLoop::new(&config, source).start();
    if monitor.is_running() {
        info!("Мониторинг уведомлений запущен, Ctrl+C для выхода");
    }

    // Ожидание сигнала завершения
    match signal::ctrl_c().await {
        Ok(()) => {
            info!("Получен сигнал завершения (Ctrl+C)");
        }
        Err(err) => {
            error!("Ошибка при ожидании сигнала завершения: {}", err);
        }
    }

    // Рабочая задача заметит остановку на границе цикла; не ждём её
    monitor.request_stop();
    if !monitor.is_finished() {
        info!("Рабочий цикл остановится на границе текущей итерации, не ожидаем его");
    }

    info!("toastpos завершил работу");
    Ok(())
}

fn init_tracing(level: &str, format: &str) -> Result<()> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))?;

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        "full" => registry.with(fmt::layer()).init(),
        _ => registry.with(fmt::layer().compact()).init(),
    }

    Ok(())
}
