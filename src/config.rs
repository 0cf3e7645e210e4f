// src/config.rs
//! Параметры построения и отрисовки речной карты
//!
//! Все параметры, управляющие итоговой картинкой:
//! - Масштаб клетки и толщина речных линий
//! - Натяжение сплайна и амплитуда дрожания узлов
//! - Переключатель сглаживания стыков
//!
//! Структура поддерживает сериализацию в TOML для настройки через
//! конфигурационные файлы; каждое поле имеет значение по умолчанию,
//! поэтому частичные конфигурации допустимы.

use serde::{Deserialize, Serialize};
use std::fs;

/// Параметры отрисовки речной карты
///
/// # Пример
/// ```
/// use rivermap::config::RenderParams;
///
/// let params = RenderParams::default();
/// assert_eq!(params.scale, 10);
/// assert!(params.smoothing);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderParams {
    /// Сид генератора случайных чисел (детерминированное дрожание линий)
    #[serde(default)]
    pub seed: u64,

    /// Размер клетки в пикселях итогового изображения
    #[serde(default = "default_scale")]
    pub scale: u32,

    /// Натяжение кардинального сплайна:
    /// - `0.0` — ломаная без изгибов,
    /// - `~0.5` — классический Catmull-Rom,
    /// - `~0.8` — свободные, размашистые изгибы.
    #[serde(default = "default_curve_tension")]
    pub curve_tension: f32,

    /// Амплитуда дрожания узлов в долях клетки (`0.0` отключает)
    #[serde(default = "default_jitter")]
    pub jitter: f32,

    /// Переносить ли узлы на середины границ клеток (сглаживание стыков)
    #[serde(default = "default_smoothing")]
    pub smoothing: bool,

    /// Полутолщина речной линии в пикселях
    #[serde(default = "default_stroke_width")]
    pub stroke_width: u32,
}

fn default_scale() -> u32 {
    10
}
fn default_curve_tension() -> f32 {
    0.8
}
fn default_jitter() -> f32 {
    0.2
}
fn default_smoothing() -> bool {
    true
}
fn default_stroke_width() -> u32 {
    2
}

impl Default for RenderParams {
    fn default() -> Self {
        Self {
            seed: 0,
            scale: 10,
            curve_tension: 0.8,
            jitter: 0.2,
            smoothing: true,
            stroke_width: 2,
        }
    }
}

impl RenderParams {
    /// Загружает параметры из TOML-файла
    ///
    /// # Ошибки
    /// Возвращает ошибку, если файл не найден или содержит недопустимый
    /// формат.
    ///
    /// # Пример
    /// ```toml
    /// # rivers.toml
    /// seed = 42
    /// scale = 16
    /// jitter = 0.0
    /// ```
    ///
    /// ```no_run
    /// use rivermap::config::RenderParams;
    ///
    /// let params = RenderParams::from_toml_file("rivers.toml").unwrap();
    /// assert_eq!(params.seed, 42);
    /// ```
    pub fn from_toml_file(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(path)?;
        let params: Self = toml::from_str(&contents)?;
        Ok(params)
    }
}
