use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    pub logging: LoggingConfig,
    pub monitor: MonitorConfig,
    pub placement: PlacementConfig,
    pub classifier: ClassifierConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MonitorConfig {
    pub poll_interval_ms: u64,
    pub settle_delay_ms: u64,
}

/// Якорь в правом верхнем углу основного экрана
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlacementConfig {
    pub margin_px: i32,
    pub target_y: i32,
    pub tolerance_px: i32,
    /// Окна шире этого значения считаются шумом
    pub max_width: i32,
    /// Окна выше этого значения считаются шумом
    pub max_height: i32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClassifierConfig {
    pub notification_titles: Vec<String>,
    pub class_markers: Vec<String>,
    pub title_markers: Vec<String>,
    pub min_width: i32,
    pub max_width: i32,
    pub min_height: i32,
    pub max_height: i32,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "compact".to_string(),
        }
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 500,
            settle_delay_ms: 100,
        }
    }
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            margin_px: 10,
            target_y: 10,
            tolerance_px: 50,
            max_width: 2000,
            max_height: 1000,
        }
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            notification_titles: vec!["新しい通知".to_string(), "New notification".to_string()],
            class_markers: vec!["Toast".to_string(), "Notification".to_string()],
            title_markers: vec!["通知".to_string()],
            min_width: 200,
            max_width: 600,
            min_height: 50,
            max_height: 400,
        }
    }
}

impl MonitorConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

impl Config {
    /// Значения по умолчанию <- TOML-файл (может отсутствовать) <- переменные TOASTPOS_*
    pub fn load<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let config_path = config_path.as_ref();

        let figment = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_path))
            .merge(Env::prefixed("TOASTPOS_").split("__"));

        let config: Config = figment
            .extract()
            .with_context(|| format!("Не удалось загрузить конфигурацию из {:?}", config_path))?;

        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        // Валидация настроек логирования
        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!("Неверный уровень логирования: {}", self.logging.level),
        }

        match self.logging.format.as_str() {
            "compact" | "full" => {}
            _ => anyhow::bail!("Неверный формат логирования: {}", self.logging.format),
        }

        // Валидация цикла мониторинга
        if self.monitor.poll_interval_ms < 100 {
            anyhow::bail!("poll_interval_ms должно быть минимум 100");
        }

        if self.monitor.settle_delay_ms > 5000 {
            anyhow::bail!("settle_delay_ms должно быть не больше 5000");
        }

        // Валидация якоря
        if self.placement.tolerance_px <= 0 {
            anyhow::bail!("tolerance_px должно быть больше 0");
        }

        if self.placement.margin_px < 0 || self.placement.target_y < 0 {
            anyhow::bail!("margin_px и target_y не могут быть отрицательными");
        }

        if self.placement.max_width <= 0 || self.placement.max_height <= 0 {
            anyhow::bail!("max_width и max_height должны быть больше 0");
        }

        // Валидация эвристики
        let classifier = &self.classifier;
        if classifier.min_width > classifier.max_width {
            anyhow::bail!(
                "min_width ({}) больше max_width ({})",
                classifier.min_width,
                classifier.max_width
            );
        }

        if classifier.min_height > classifier.max_height {
            anyhow::bail!(
                "min_height ({}) больше max_height ({})",
                classifier.min_height,
                classifier.max_height
            );
        }

        let all_markers = classifier
            .notification_titles
            .iter()
            .chain(&classifier.class_markers)
            .chain(&classifier.title_markers);
        for (i, marker) in all_markers.enumerate() {
            if marker.is_empty() {
                anyhow::bail!("Пустая строка в правилах классификатора (#{})", i + 1);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.monitor.poll_interval(), Duration::from_millis(500));
        assert_eq!(config.monitor.settle_delay(), Duration::from_millis(100));
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let config = Config::load("/nonexistent/toastpos.toml").unwrap();
        assert_eq!(config.placement.margin_px, 10);
        assert_eq!(config.placement.tolerance_px, 50);
        assert_eq!(
            config.classifier.notification_titles,
            vec!["新しい通知".to_string(), "New notification".to_string()]
        );
    }

    #[test]
    fn test_load_merges_toml_over_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "toastpos.toml",
                r#"
                [placement]
                margin_px = 24

                [classifier]
                class_markers = ["Popup"]
                "#,
            )?;
            jail.set_env("TOASTPOS_MONITOR__POLL_INTERVAL_MS", "250");

            let config = Config::load("toastpos.toml").map_err(|e| e.to_string())?;
            assert_eq!(config.placement.margin_px, 24);
            assert_eq!(config.placement.target_y, 10);
            assert_eq!(config.classifier.class_markers, vec!["Popup".to_string()]);
            assert_eq!(config.monitor.poll_interval_ms, 250);
            Ok(())
        });
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut config = Config::default();
        config.monitor.poll_interval_ms = 10;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.placement.tolerance_px = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.classifier.min_width = 700;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.classifier.title_markers.push(String::new());
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.logging.format = "json".to_string();
        assert!(config.validate().is_err());
    }
}
