use crate::config::ClassifierConfig;
use crate::debug_if_enabled;
use crate::error::Result;
use crate::events::{MatchKind, WindowDescriptor, WindowHandle, WindowRect};
use crate::services::window_source::WindowSource;

/// Окно, выбранное классификатором в этом цикле
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub handle: WindowHandle,
    pub kind: MatchKind,
}

/// Выбирает не более одного окна, похожего на всплывающее уведомление.
///
/// Сначала прямой поиск по точному заголовку, затем (только если он ничего
/// не дал) эвристика по полному перечислению: маркер в имени класса или
/// заголовке плюс типичный для уведомления размер. Побеждает первое
/// подходящее окно в порядке перечисления ОС, который не совпадает с
/// Z-порядком: при нескольких уведомлениях на экране выбор произволен.
pub struct WindowClassifier {
    rules: ClassifierConfig,
}

impl WindowClassifier {
    pub fn new(rules: ClassifierConfig) -> Self {
        Self { rules }
    }

    pub fn classify(&self, source: &dyn WindowSource) -> Result<Option<Candidate>> {
        if let Some(handle) = self.find_exact_title(source)? {
            debug_if_enabled!("Уведомление {} найдено прямым поиском по заголовку", handle);
            return Ok(Some(Candidate {
                handle,
                kind: MatchKind::ExactTitle,
            }));
        }

        let windows = source.windows()?;
        Ok(self.select(windows))
    }

    /// FindWindow находит и скрытые окна: такие не кандидаты
    fn find_exact_title(&self, source: &dyn WindowSource) -> Result<Option<WindowHandle>> {
        for title in &self.rules.notification_titles {
            match source.find_by_title(title)? {
                Some(handle) if source.is_visible(handle) => return Ok(Some(handle)),
                Some(handle) => {
                    debug_if_enabled!("Окно {} с заголовком \"{}\" скрыто, пропускаем", handle, title);
                }
                None => {}
            }
        }
        Ok(None)
    }

    /// Эвристический проход: перестаёт читать последовательность на первом совпадении
    pub fn select<I>(&self, windows: I) -> Option<Candidate>
    where
        I: IntoIterator<Item = WindowDescriptor>,
    {
        windows.into_iter().find_map(|window| {
            self.verdict(&window).map(|kind| Candidate {
                handle: window.handle,
                kind,
            })
        })
    }

    /// Подходит ли отдельное окно и по какому правилу
    pub fn verdict(&self, window: &WindowDescriptor) -> Option<MatchKind> {
        if !window.visible {
            return None;
        }

        if self.is_notification_title(&window.title) {
            return Some(MatchKind::ExactTitle);
        }

        let marked = self
            .rules
            .class_markers
            .iter()
            .any(|marker| window.class_name.contains(marker.as_str()))
            || self
                .rules
                .title_markers
                .iter()
                .any(|marker| window.title.contains(marker.as_str()));

        if marked && self.has_toast_size(&window.rect) {
            Some(MatchKind::Heuristic)
        } else {
            None
        }
    }

    fn is_notification_title(&self, title: &str) -> bool {
        self.rules.notification_titles.iter().any(|t| t == title)
    }

    fn has_toast_size(&self, rect: &WindowRect) -> bool {
        (self.rules.min_width..=self.rules.max_width).contains(&rect.width())
            && (self.rules.min_height..=self.rules.max_height).contains(&rect.height())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::window_source::SimulatedDesktop;
    use std::cell::Cell;

    fn classifier() -> WindowClassifier {
        WindowClassifier::new(ClassifierConfig::default())
    }

    fn window(handle: isize, title: &str, class_name: &str, width: i32, height: i32) -> WindowDescriptor {
        WindowDescriptor::new(
            WindowHandle::new(handle),
            title.to_string(),
            WindowRect::from_origin(100, 100, width, height),
        )
        .with_class(class_name.to_string())
    }

    #[test]
    fn test_exact_title_fast_path_skips_enumeration() {
        let desktop = SimulatedDesktop::new(1920);
        desktop.open("Explorer", "CabinetWClass", WindowRect::from_origin(0, 0, 1200, 800));
        let toast = desktop.open("New notification", "Windows.UI.Core.CoreWindow", WindowRect::new(1200, 20, 1500, 120));

        let candidate = classifier().classify(&desktop).unwrap();
        assert_eq!(
            candidate,
            Some(Candidate {
                handle: toast,
                kind: MatchKind::ExactTitle
            })
        );
        assert_eq!(desktop.calls().enumerations, 0);
    }

    #[test]
    fn test_hidden_exact_title_falls_through() {
        let desktop = SimulatedDesktop::new(1920);
        let host = desktop.open("New notification", "Windows.UI.Core.CoreWindow", WindowRect::new(1610, 10, 1910, 110));
        desktop.set_visible(host, false);
        assert_eq!(classifier().classify(&desktop).unwrap(), None);
        assert_eq!(desktop.calls().enumerations, 1);

        let toast = desktop.open("Build finished", "ShellNotificationHost", WindowRect::from_origin(1500, 800, 300, 150));
        let candidate = classifier().classify(&desktop).unwrap().unwrap();
        assert_eq!(candidate.handle, toast);
        assert_eq!(candidate.kind, MatchKind::Heuristic);
    }

    #[test]
    fn test_visible_title_found_after_hidden_one() {
        let desktop = SimulatedDesktop::new(1920);
        let hidden = desktop.open("新しい通知", "Windows.UI.Core.CoreWindow", WindowRect::new(1200, 20, 1500, 120));
        desktop.set_visible(hidden, false);
        let toast = desktop.open("New notification", "Windows.UI.Core.CoreWindow", WindowRect::new(1200, 20, 1500, 120));

        let candidate = classifier().classify(&desktop).unwrap().unwrap();
        assert_eq!(candidate.handle, toast);
        assert_eq!(candidate.kind, MatchKind::ExactTitle);
        assert_eq!(desktop.calls().enumerations, 0);
    }

    #[test]
    fn test_heuristic_fallback_by_class_marker() {
        let desktop = SimulatedDesktop::new(1920);
        desktop.open("Explorer", "CabinetWClass", WindowRect::from_origin(0, 0, 1200, 800));
        let toast = desktop.open("Build finished", "ShellNotificationHost", WindowRect::from_origin(1500, 800, 300, 150));

        let candidate = classifier().classify(&desktop).unwrap().unwrap();
        assert_eq!(candidate.handle, toast);
        assert_eq!(candidate.kind, MatchKind::Heuristic);
        assert_eq!(desktop.calls().enumerations, 1);
    }

    #[test]
    fn test_title_marker_matches() {
        let found = classifier().select(vec![window(1, "システム通知", "Popup", 360, 120)]);
        assert_eq!(found.map(|c| c.kind), Some(MatchKind::Heuristic));
    }

    #[test]
    fn test_size_bounds_are_inclusive() {
        let c = classifier();
        assert!(c.verdict(&window(1, "", "Toast", 200, 50)).is_some());
        assert!(c.verdict(&window(2, "", "Toast", 600, 400)).is_some());
        assert!(c.verdict(&window(3, "", "Toast", 199, 100)).is_none());
        assert!(c.verdict(&window(4, "", "Toast", 300, 401)).is_none());
        assert!(c.verdict(&window(5, "", "Toast", 300, 0)).is_none());
    }

    #[test]
    fn test_markers_without_size_or_size_without_markers_do_not_match() {
        let c = classifier();
        assert!(c.verdict(&window(1, "Notification center", "Chrome", 1200, 900)).is_none());
        assert!(c.verdict(&window(2, "Calculator", "ApplicationFrameWindow", 320, 200)).is_none());
    }

    #[test]
    fn test_exact_title_in_enumeration_ignores_size() {
        let found = classifier().select(vec![window(9, "新しい通知", "Anything", 1000, 900)]);
        assert_eq!(found.map(|c| c.kind), Some(MatchKind::ExactTitle));
    }

    #[test]
    fn test_invisible_windows_skipped() {
        let hidden = window(1, "New notification", "Toast", 300, 100).with_visible(false);
        let shown = window(2, "", "ToastWindow", 300, 100);
        let found = classifier().select(vec![hidden, shown]).unwrap();
        assert_eq!(found.handle, WindowHandle::new(2));
    }

    #[test]
    fn test_first_match_wins_and_stops_pulling() {
        let windows = vec![
            window(1, "Editor", "Notepad", 800, 600),
            window(2, "", "ToastA", 300, 100),
            window(3, "", "ToastB", 300, 100),
            window(4, "", "ToastC", 300, 100),
        ];
        let pulled = Cell::new(0);
        let found = classifier().select(windows.into_iter().inspect(|_| pulled.set(pulled.get() + 1)));

        assert_eq!(found.unwrap().handle, WindowHandle::new(2));
        assert_eq!(pulled.get(), 2);
    }

    #[test]
    fn test_nothing_qualifies() {
        let desktop = SimulatedDesktop::new(1920);
        desktop.open("Explorer", "CabinetWClass", WindowRect::from_origin(0, 0, 1200, 800));
        assert_eq!(classifier().classify(&desktop).unwrap(), None);
    }
}
