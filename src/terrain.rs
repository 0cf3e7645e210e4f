// src/terrain.rs
//! Классификация местности
//!
//! Этот модуль превращает исходное PNG-изображение в сетку типов клеток:
//! - Каждому пикселю соответствует ровно одна клетка карты
//! - Цвет пикселя однозначно определяет тип клетки (фиксированная палитра)
//! - Неизвестный цвет — ошибка классификации с координатой пикселя
//!
//! Сетка неизменяема после построения: все последующие проходы
//! (построение сети, сглаживание, отрисовка) только читают её.

use image::RgbaImage;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Целочисленная координата клетки
///
/// Координаты знаковые: соседи граничных клеток могут выходить за пределы
/// карты, и такие точки просто не классифицируются ([`TerrainMap::get`]
/// возвращает `None`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    #[must_use]
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Сосед со смещением `(dx, dy)`
    #[must_use]
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Тип клетки карты
///
/// Закрытое перечисление: градации рек от ручья до крупной реки,
/// устьевая клетка река/океан, а также озеро, суша, горы и океан.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerrainType {
    Brook,
    Stream,
    MinorRiver,
    River,
    MajorRiver,
    RiverOcean,
    Mountain,
    Lake,
    Land,
    Ocean,
}

impl TerrainType {
    /// Является ли клетка текущей водой (любая градация реки плюс устье)
    #[must_use]
    pub fn is_river(self) -> bool {
        matches!(
            self,
            TerrainType::Brook
                | TerrainType::Stream
                | TerrainType::MinorRiver
                | TerrainType::River
                | TerrainType::MajorRiver
                | TerrainType::RiverOcean
        )
    }

    /// Проходимая суша: обычная земля и горы
    #[must_use]
    pub fn is_land(self) -> bool {
        matches!(self, TerrainType::Land | TerrainType::Mountain)
    }

    /// Тип клетки по цвету исходного пикселя (альфа-канал игнорируется)
    #[must_use]
    pub fn from_color(rgb: [u8; 3]) -> Option<Self> {
        match rgb {
            [0, 255, 255] => Some(TerrainType::Brook),
            [0, 224, 255] => Some(TerrainType::Stream),
            [0, 192, 255] => Some(TerrainType::MinorRiver),
            [0, 160, 255] => Some(TerrainType::River),
            [0, 128, 255] => Some(TerrainType::MajorRiver),
            [0, 112, 255] => Some(TerrainType::RiverOcean),
            [255, 255, 192] => Some(TerrainType::Mountain),
            [0, 96, 255] => Some(TerrainType::Lake),
            [128, 64, 32] => Some(TerrainType::Land),
            [0, 64, 255] => Some(TerrainType::Ocean),
            _ => None,
        }
    }

    /// Цвет клетки в палитре исходных карт
    #[must_use]
    pub fn color(self) -> [u8; 3] {
        match self {
            TerrainType::Brook => [0, 255, 255],
            TerrainType::Stream => [0, 224, 255],
            TerrainType::MinorRiver => [0, 192, 255],
            TerrainType::River => [0, 160, 255],
            TerrainType::MajorRiver => [0, 128, 255],
            TerrainType::RiverOcean => [0, 112, 255],
            TerrainType::Mountain => [255, 255, 192],
            TerrainType::Lake => [0, 96, 255],
            TerrainType::Land => [128, 64, 32],
            TerrainType::Ocean => [0, 64, 255],
        }
    }
}

/// Ошибка классификации: пиксель с цветом вне палитры
#[derive(Debug, Error)]
#[error("unrecognized terrain color {color:?} at pixel ({x}, {y})")]
pub struct ClassifyError {
    pub x: u32,
    pub y: u32,
    pub color: [u8; 3],
}

/// Двумерная сетка типов клеток
#[derive(Debug, Clone)]
pub struct TerrainMap {
    pub width: u32,
    pub height: u32,
    pub data: Vec<TerrainType>,
}

impl TerrainMap {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![TerrainType::Land; (width * height) as usize],
        }
    }

    /// Тип клетки в точке `p`; `None` за пределами карты
    #[must_use]
    pub fn get(&self, p: Point) -> Option<TerrainType> {
        if p.x < 0 || p.y < 0 || p.x >= self.width as i32 || p.y >= self.height as i32 {
            return None;
        }
        Some(self.data[(p.y as u32 * self.width + p.x as u32) as usize])
    }

    pub fn set(&mut self, x: u32, y: u32, value: TerrainType) {
        self.data[(y * self.width + x) as usize] = value;
    }

    /// Есть ли в точке `p` река
    #[must_use]
    pub fn is_river_at(&self, p: Point) -> bool {
        self.get(p).is_some_and(TerrainType::is_river)
    }

    /// Классифицирует каждый пиксель изображения в тип клетки
    ///
    /// # Ошибки
    /// Возвращает [`ClassifyError`] с координатой первого пикселя,
    /// цвет которого не входит в палитру.
    pub fn from_image(img: &RgbaImage) -> Result<Self, ClassifyError> {
        let (width, height) = img.dimensions();

        let classified: Vec<Option<TerrainType>> = img
            .as_raw()
            .par_chunks_exact(4)
            .map(|px| TerrainType::from_color([px[0], px[1], px[2]]))
            .collect();

        if let Some(i) = classified.iter().position(Option::is_none) {
            let x = i as u32 % width;
            let y = i as u32 / width;
            let px = img.get_pixel(x, y).0;
            return Err(ClassifyError {
                x,
                y,
                color: [px[0], px[1], px[2]],
            });
        }

        Ok(Self {
            width,
            height,
            data: classified.into_iter().flatten().collect(),
        })
    }

    /// Тестовая сборка карты из ASCII-строк (одна строка — один ряд клеток)
    ///
    /// `~` океан, `l` озеро, `.` суша, `m` горы, `b` ручей, `s` поток,
    /// `n` малая река, `r` река, `R` крупная река, `o` река/океан.
    #[cfg(test)]
    pub(crate) fn from_rows(rows: &[&str]) -> Self {
        let height = rows.len() as u32;
        let width = rows[0].len() as u32;
        let mut map = Self::new(width, height);
        for (y, row) in rows.iter().enumerate() {
            assert_eq!(row.len() as u32, width, "ряды должны быть одной длины");
            for (x, ch) in row.chars().enumerate() {
                let t = match ch {
                    '~' => TerrainType::Ocean,
                    'l' => TerrainType::Lake,
                    '.' => TerrainType::Land,
                    'm' => TerrainType::Mountain,
                    'b' => TerrainType::Brook,
                    's' => TerrainType::Stream,
                    'n' => TerrainType::MinorRiver,
                    'r' => TerrainType::River,
                    'R' => TerrainType::MajorRiver,
                    'o' => TerrainType::RiverOcean,
                    _ => panic!("неизвестный символ клетки: {ch}"),
                };
                map.set(x as u32, y as u32, t);
            }
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn color_palette_round_trips() {
        for t in [
            TerrainType::Brook,
            TerrainType::MajorRiver,
            TerrainType::RiverOcean,
            TerrainType::Lake,
            TerrainType::Ocean,
            TerrainType::Land,
        ] {
            assert_eq!(TerrainType::from_color(t.color()), Some(t));
        }
        assert_eq!(TerrainType::from_color([1, 2, 3]), None);
    }

    #[test]
    fn river_class_excludes_still_water() {
        assert!(TerrainType::Brook.is_river());
        assert!(TerrainType::RiverOcean.is_river());
        assert!(!TerrainType::Lake.is_river());
        assert!(!TerrainType::Ocean.is_river());
        assert!(TerrainType::Mountain.is_land());
        assert!(!TerrainType::Ocean.is_land());
    }

    #[test]
    fn get_is_none_out_of_bounds() {
        let map = TerrainMap::from_rows(&["..", ".."]);
        assert_eq!(map.get(Point::new(0, 0)), Some(TerrainType::Land));
        assert_eq!(map.get(Point::new(-1, 0)), None);
        assert_eq!(map.get(Point::new(0, 2)), None);
        assert_eq!(map.get(Point::new(2, 1)), None);
    }

    #[test]
    fn classifies_image_pixels() {
        let mut img = RgbaImage::from_pixel(3, 2, Rgba([128, 64, 32, 255]));
        img.put_pixel(0, 0, Rgba([0, 64, 255, 255]));
        img.put_pixel(2, 1, Rgba([0, 255, 255, 255]));

        let map = TerrainMap::from_image(&img).unwrap();
        assert_eq!(map.get(Point::new(0, 0)), Some(TerrainType::Ocean));
        assert_eq!(map.get(Point::new(1, 0)), Some(TerrainType::Land));
        assert_eq!(map.get(Point::new(2, 1)), Some(TerrainType::Brook));
    }

    #[test]
    fn unknown_color_reports_pixel() {
        let mut img = RgbaImage::from_pixel(2, 2, Rgba([128, 64, 32, 255]));
        img.put_pixel(1, 1, Rgba([9, 9, 9, 255]));

        let err = TerrainMap::from_image(&img).unwrap_err();
        assert_eq!((err.x, err.y), (1, 1));
        assert_eq!(err.color, [9, 9, 9]);
    }
}
