use crate::config::{Config, PlacementConfig};
use crate::debug_if_enabled;
use crate::error::{Result, ToastError};
use crate::events::CycleOutcome;
use crate::services::classifier::WindowClassifier;
use crate::services::position_tracker::{Action, Anchor, PositionTracker};
use crate::services::repositioner::Repositioner;
use crate::services::window_source::WindowSource;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::{sleep, Duration};
use tracing::{debug, info, warn};

/// Флаг работы: один писатель (команда остановки), один читатель (рабочий цикл)
#[derive(Debug, Clone)]
pub struct RunState(Arc<AtomicBool>);

impl RunState {
    fn new() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    pub fn is_running(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub fn request_stop(&self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Счётчики рабочего цикла
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleStats {
    pub cycles: u64,
    pub repositioned: u64,
    pub failed_moves: u64,
    pub failed_cycles: u64,
}

impl fmt::Display for CycleStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "циклов: {}, перемещено: {}, отказов перемещения: {}, прерванных циклов: {}",
            self.cycles, self.repositioned, self.failed_moves, self.failed_cycles
        )
    }
}

/// Опрос окон с фиксированным интервалом: классификация, очистка реестра,
/// решение, перемещение.
///
/// Всё состояние (реестр, флаг работы, счётчики) принадлежит одному
/// экземпляру, который живёт в единственной фоновой задаче.
pub struct MonitorLoop {
    source: Box<dyn WindowSource>,
    classifier: WindowClassifier,
    tracker: PositionTracker,
    repositioner: Repositioner,
    placement: PlacementConfig,
    poll_interval: Duration,
    run_state: RunState,
    stats: CycleStats,
}

impl MonitorLoop {
    pub fn new(config: &Config, source: Box<dyn WindowSource>) -> Self {
        info!(
            "Инициализация MonitorLoop (интервал {}мс, задержка {}мс)",
            config.monitor.poll_interval_ms, config.monitor.settle_delay_ms
        );

        Self {
            source,
            classifier: WindowClassifier::new(config.classifier.clone()),
            tracker: PositionTracker::new(&config.placement),
            repositioner: Repositioner::new(config.monitor.settle_delay()),
            placement: config.placement.clone(),
            poll_interval: config.monitor.poll_interval(),
            run_state: RunState::new(),
            stats: CycleStats::default(),
        }
    }

    pub fn run_state(&self) -> RunState {
        self.run_state.clone()
    }

    /// Один цикл: поиск кандидата, очистка реестра, решение и перемещение
    pub async fn run_cycle(&mut self) -> Result<CycleOutcome> {
        let source = self.source.as_ref();

        let candidate = self.classifier.classify(source)?;

        // Очистка выполняется в каждом цикле, даже без кандидата
        let removed = self.tracker.prune(|handle| source.is_visible(handle));
        if !removed.is_empty() {
            debug_if_enabled!(
                "Из реестра удалено {} скрытых окон, отслеживается {}",
                removed.len(),
                self.tracker.len()
            );
        }

        let Some(candidate) = candidate else {
            return Ok(CycleOutcome::Idle);
        };
        let handle = candidate.handle;

        let rect = source.window_rect(handle)?;
        let anchor = Anchor::new(source.primary_screen_width()?, &self.placement);

        let action = match self.tracker.decide(handle, rect, &anchor) {
            Ok(action) => action,
            Err(ToastError::InvalidGeometry { width, height }) => {
                debug_if_enabled!("Окно {} пропущено: размер {}x{}", handle, width, height);
                return Ok(CycleOutcome::Skipped { handle });
            }
            Err(e) => return Err(e),
        };

        match action {
            Action::RecordOnly => {
                self.tracker.record(handle, rect);
                Ok(CycleOutcome::Recorded { handle, rect })
            }
            Action::Reposition { x, y } => match self.repositioner.apply(source, handle, x, y).await {
                Ok(moved) => {
                    self.tracker.record(handle, moved);
                    self.stats.repositioned += 1;
                    info!(
                        "Уведомление {} ({:?}) перемещено: {} -> {}",
                        handle, candidate.kind, rect, moved
                    );
                    Ok(CycleOutcome::Repositioned {
                        handle,
                        from: rect,
                        to: moved,
                    })
                }
                Err(e) => {
                    self.stats.failed_moves += 1;
                    debug!("Не удалось переместить окно {}: {}", handle, e);
                    Ok(CycleOutcome::RepositionFailed { handle })
                }
            },
        }
    }

    /// Крутится до команды остановки; ошибка цикла никогда не останавливает мониторинг
    pub async fn run(mut self) -> CycleStats {
        info!("MonitorLoop запущен");

        while self.run_state.is_running() {
            self.stats.cycles += 1;

            match self.run_cycle().await {
                Ok(CycleOutcome::Idle) => {}
                Ok(outcome) => debug_if_enabled!("Цикл #{}: {}", self.stats.cycles, outcome),
                Err(e) if e.is_transient() => {
                    self.stats.failed_cycles += 1;
                    debug!("Цикл #{} прерван: {}", self.stats.cycles, e);
                }
                Err(e) => {
                    self.stats.failed_cycles += 1;
                    warn!("Цикл #{} прерван: {}", self.stats.cycles, e);
                }
            }

            sleep(self.poll_interval).await;
        }

        info!("MonitorLoop остановлен ({})", self.stats);
        self.stats
    }

    /// Запускает рабочую задачу и возвращает управляющую сторону
    pub fn start(self) -> MonitorHandle {
        let run_state = self.run_state();
        let worker = tokio::spawn(self.run());
        MonitorHandle { run_state, worker }
    }
}

/// Управляющая сторона: остановка и статус. Рабочая задача не ожидается при выходе.
pub struct MonitorHandle {
    run_state: RunState,
    worker: JoinHandle<CycleStats>,
}

impl MonitorHandle {
    /// Остановка вступает в силу на границе следующего цикла
    pub fn request_stop(&self) {
        self.run_state.request_stop();
    }

    pub fn is_running(&self) -> bool {
        self.run_state.is_running()
    }

    pub fn is_finished(&self) -> bool {
        self.worker.is_finished()
    }

    #[cfg(test)]
    pub async fn join(self) -> CycleStats {
        self.worker.await.expect("рабочая задача завершилась паникой")
    }
}
