// src/network/smooth.rs
//! Сглаживание стыков: перенос узлов на границы клеток
//!
//! Вдоль неразветвлённых участков узел рисуется не по центру клетки,
//! а по середине границы с родительской клеткой — интерполированная
//! кривая тогда входит в клетку и выходит из неё через общие рёбра.
//! Корни и развилки сохраняют центры: кривая должна проходить через
//! саму точку ветвления без искажения серединами рёбер.

use super::{NetworkError, RiverForest};
use crate::terrain::Point;

/// Назначает серединные координаты рёбер всем узлам леса, кроме корней
/// и развилок
///
/// # Ошибки
/// [`NetworkError::BrokenAdjacency`], если родитель и ребёнок не
/// являются соседями ровно по одной оси. При построении по 4-связности
/// это недостижимо и означает порчу данных.
pub fn smooth_junctions(forest: &mut RiverForest) -> Result<(), NetworkError> {
    for id in 0..forest.nodes.len() {
        let node = &forest.nodes[id];
        let Some(parent) = node.parent else {
            continue; // корень рисуется по центру клетки
        };
        if node.children.len() > 1 {
            continue; // развилка тоже
        }
        let edge = edge_midpoint(forest.nodes[parent].center, node.center)?;
        forest.nodes[id].edge = Some(edge);
    }
    Ok(())
}

/// Середина общей границы двух соседних по одной оси клеток
pub(crate) fn edge_midpoint(a: Point, b: Point) -> Result<(f32, f32), NetworkError> {
    if a.x == b.x && a.y != b.y {
        Ok((a.x as f32, (a.y + b.y) as f32 / 2.0))
    } else if a.y == b.y && a.x != b.x {
        Ok(((a.x + b.x) as f32 / 2.0, a.y as f32))
    } else {
        Err(NetworkError::BrokenAdjacency(a, b))
    }
}
