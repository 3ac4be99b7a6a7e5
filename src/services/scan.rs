use crate::error::Result;
use crate::events::{MatchKind, WindowDescriptor};
use crate::services::classifier::{Candidate, WindowClassifier};
use crate::services::window_source::WindowSource;
use tracing::info;

/// Результат разовой диагностики: видимые окна с вердиктом и итоговый кандидат
#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    pub windows: Vec<(WindowDescriptor, Option<MatchKind>)>,
    pub candidate: Option<Candidate>,
}

/// Полное перечисление без раннего выхода и выбор кандидата так же, как в цикле
pub fn scan_windows(source: &dyn WindowSource, classifier: &WindowClassifier) -> Result<ScanReport> {
    let windows: Vec<_> = source
        .windows()?
        .filter(|window| window.visible)
        .map(|window| {
            let verdict = classifier.verdict(&window);
            (window, verdict)
        })
        .collect();

    let candidate = classifier.classify(source)?;

    Ok(ScanReport { windows, candidate })
}

impl ScanReport {
    pub fn log(&self) {
        info!("Видимых окон верхнего уровня: {}", self.windows.len());
        for (window, verdict) in &self.windows {
            let verdict = match verdict {
                Some(MatchKind::ExactTitle) => "точный заголовок",
                Some(MatchKind::Heuristic) => "эвристика",
                None => "-",
            };
            info!(
                "  {} [{}x{}] -> {}",
                window,
                window.rect.width(),
                window.rect.height(),
                verdict
            );
        }

        match &self.candidate {
            Some(candidate) => info!("Цикл выбрал бы окно {} ({:?})", candidate.handle, candidate.kind),
            None => info!("Уведомлений не найдено"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClassifierConfig;
    use crate::events::WindowRect;
    use crate::services::window_source::SimulatedDesktop;

    #[test]
    fn test_scan_reports_every_visible_window() {
        let desktop = SimulatedDesktop::new(1920);
        desktop.open("Explorer", "CabinetWClass", WindowRect::from_origin(0, 0, 1200, 800));
        let heuristic = desktop.open("", "ToastWindow", WindowRect::from_origin(1500, 850, 300, 150));
        let exact = desktop.open("New notification", "CoreWindow", WindowRect::from_origin(1500, 700, 300, 100));
        let hidden = desktop.open("", "ToastWindow", WindowRect::from_origin(1500, 500, 300, 150));
        desktop.set_visible(hidden, false);

        let classifier = WindowClassifier::new(ClassifierConfig::default());
        let report = scan_windows(&desktop, &classifier).unwrap();

        let verdicts: Vec<_> = report.windows.iter().map(|(w, v)| (w.handle, *v)).collect();
        assert_eq!(verdicts.len(), 3);
        assert_eq!(verdicts[1], (heuristic, Some(MatchKind::Heuristic)));
        assert_eq!(verdicts[2], (exact, Some(MatchKind::ExactTitle)));

        // Прямой поиск по заголовку имеет приоритет над порядком перечисления
        assert_eq!(report.candidate.map(|c| c.handle), Some(exact));
    }
}
