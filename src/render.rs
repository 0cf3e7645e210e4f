// src/render.rs
//! Отрисовка речной карты в растровое изображение
//!
//! Этот модуль собирает итоговую картинку из результатов ядра:
//! - Фон заливается цветом суши, поверх кладутся клетки океана и озёр
//! - Каждая ломаная растягивается в кардинальный сплайн и штрихуется
//!   «кистью» из залитых кругов — так линия получает толщину
//! - Узлы масштабируются в пиксели (центр клетки) и слегка дрожат:
//!   генератор сидируется из параметров, картинка воспроизводима
//! - Ломаная из одной точки рисуется полым квадратиком-маркером
//!
//! Палитра совпадает с палитрой классификации ([`TerrainType::color`]),
//! поэтому исходная карта и отрисованная согласованы по цветам.

use image::{ImageBuffer, Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect;
use rand::{Rng, SeedableRng};

use crate::config::RenderParams;
use crate::network::{Polyline, RiverNetwork};
use crate::terrain::{Point, TerrainType};

/// Рисует карту: слои суши/океана/озёр и речные линии поверх
///
/// `width` и `height` — размеры сетки в клетках; итоговое изображение
/// имеет размеры `width * scale` на `height * scale` пикселей.
#[must_use]
pub fn render_map(
    network: &RiverNetwork,
    polylines: &[Polyline],
    width: u32,
    height: u32,
    params: &RenderParams,
) -> RgbaImage {
    let scale = params.scale;
    let mut img: RgbaImage = ImageBuffer::from_pixel(
        width * scale,
        height * scale,
        rgba(TerrainType::Land.color()),
    );

    // Слои стоячей воды
    for &pt in &network.oceans {
        fill_tile(&mut img, pt, scale, TerrainType::Ocean.color());
    }
    for &pt in &network.lakes {
        fill_tile(&mut img, pt, scale, TerrainType::Lake.color());
    }

    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(params.seed);
    let amplitude = params.jitter * scale as f32;
    let stroke = rgba(TerrainType::River.color());

    for line in polylines {
        // Масштабирование к центрам клеток плюс дрожание
        let pts: Vec<(f32, f32)> = line
            .iter()
            .map(|&(x, y)| {
                let px = x * scale as f32 + scale as f32 / 2.0;
                let py = y * scale as f32 + scale as f32 / 2.0;
                if amplitude > 0.0 {
                    (
                        px + rng.gen_range(-amplitude..=amplitude),
                        py + rng.gen_range(-amplitude..=amplitude),
                    )
                } else {
                    (px, py)
                }
            })
            .collect();

        if let [(x, y)] = pts[..] {
            // Одиночная клетка — точечный маркер
            let half = (scale / 2) as i32;
            draw_hollow_rect_mut(
                &mut img,
                Rect::at(x as i32 - half, y as i32 - half).of_size(scale, scale),
                stroke,
            );
        } else {
            stroke_spline(&mut img, &pts, params, stroke);
        }
    }

    img
}

fn rgba(rgb: [u8; 3]) -> Rgba<u8> {
    Rgba([rgb[0], rgb[1], rgb[2], 255])
}

fn fill_tile(img: &mut RgbaImage, pt: Point, scale: u32, rgb: [u8; 3]) {
    draw_filled_rect_mut(
        img,
        Rect::at(pt.x * scale as i32, pt.y * scale as i32).of_size(scale, scale),
        rgba(rgb),
    );
}

/// Штрихует сплайн кистью из залитых кругов
fn stroke_spline(img: &mut RgbaImage, pts: &[(f32, f32)], params: &RenderParams, color: Rgba<u8>) {
    // Плотность выборки растёт с масштабом, чтобы штрихи смыкались
    let steps = (params.scale as usize).max(4);
    for (x, y) in sample_cardinal_spline(pts, params.curve_tension, steps) {
        draw_filled_circle_mut(
            img,
            (x.round() as i32, y.round() as i32),
            params.stroke_width as i32,
            color,
        );
    }
}

/// Выборка точек кардинального сплайна через вершины ломаной
///
/// Касательная в вершине — `tension * (p_next - p_prev)`; крайние
/// вершины дублируются. `steps` — число отрезков выборки на сегмент.
/// Сплайн проходит через все вершины исходной ломаной.
#[must_use]
pub fn sample_cardinal_spline(
    points: &[(f32, f32)],
    tension: f32,
    steps: usize,
) -> Vec<(f32, f32)> {
    if points.len() < 2 || steps == 0 {
        return points.to_vec();
    }

    let mut out = Vec::with_capacity((points.len() - 1) * steps + 1);
    out.push(points[0]);

    for i in 0..points.len() - 1 {
        let p0 = if i == 0 { points[0] } else { points[i - 1] };
        let p1 = points[i];
        let p2 = points[i + 1];
        let p3 = if i + 2 < points.len() {
            points[i + 2]
        } else {
            points[i + 1]
        };

        let m1 = (tension * (p2.0 - p0.0), tension * (p2.1 - p0.1));
        let m2 = (tension * (p3.0 - p1.0), tension * (p3.1 - p1.1));

        for s in 1..=steps {
            let t = s as f32 / steps as f32;
            out.push(hermite(p1, p2, m1, m2, t));
        }
    }

    out
}

/// Кубический эрмитов сплайн между `p1` и `p2` с касательными `m1`, `m2`
fn hermite(
    p1: (f32, f32),
    p2: (f32, f32),
    m1: (f32, f32),
    m2: (f32, f32),
    t: f32,
) -> (f32, f32) {
    let t2 = t * t;
    let t3 = t2 * t;
    let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
    let h10 = t3 - 2.0 * t2 + t;
    let h01 = -2.0 * t3 + 3.0 * t2;
    let h11 = t3 - t2;
    (
        h00 * p1.0 + h10 * m1.0 + h01 * p2.0 + h11 * m2.0,
        h00 * p1.1 + h10 * m1.1 + h01 * p2.1 + h11 * m2.1,
    )
}

/// Экспортирует ломаные в JSON для внешних рендереров
pub fn save_polylines_json(
    polylines: &[Polyline],
    path: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let file = std::fs::File::create(path)?;
    serde_json::to_writer(file, polylines)?;
    Ok(())
}
