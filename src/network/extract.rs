// src/network/extract.rs
//! Разборка леса на ломаные
//!
//! Каждое дерево превращается в набор простых ломаных: активная линия
//! идёт по доминирующим детям до листа, а каждая боковая ветвь
//! отделяется от точки развилки синтетическим корнем, который копирует
//! координаты развилки и попадает в очередь как самостоятельный ствол.
//! Так сохраняется визуальная связность ветвей без циклических ссылок.

use std::collections::VecDeque;

use log::debug;

use super::{NodeId, RiverForest};

/// Упорядоченная последовательность точек одной речной линии
pub type Polyline = Vec<(f32, f32)>;

/// Извлекает ломаные из размеченного (и, при желании, сглаженного) леса
///
/// При `smoothing` узлы отдают середину границы с родителем, если она
/// назначена; иначе всегда центры клеток. Лес дополняется синтетическими
/// узлами отделённых ветвей, поэтому принимается по `&mut`.
pub fn extract_polylines(forest: &mut RiverForest, smoothing: bool) -> Vec<Polyline> {
    let mut work: VecDeque<NodeId> = forest.roots.iter().copied().collect();
    let mut polylines = Vec::new();

    while let Some(start) = work.pop_front() {
        let mut points = vec![forest.node(start).vertex(smoothing)];
        let mut current = start;

        while !forest.nodes[current].children.is_empty() {
            let dominant = forest.nodes[current].dominant;
            let children = forest.nodes[current].children.clone();

            // Боковые ветви уходят в очередь отдельными стволами,
            // стартующими из координат развилки
            for (i, &child) in children.iter().enumerate() {
                if i == dominant {
                    continue;
                }
                let fork =
                    forest.push_detached(forest.nodes[current].center, forest.nodes[current].edge);
                forest.nodes[fork].children.push(child);
                // Поддерево уже размечено, пересчёт сводится к одному шагу
                forest.nodes[fork].tail_length = forest.nodes[child].tail_length + 1;
                forest.nodes[fork].dominant = 0;
                work.push_back(fork);
            }

            current = children[dominant];
            points.push(forest.node(current).vertex(smoothing));
        }

        polylines.push(points);
    }

    debug!("извлечено {} ломаных", polylines.len());
    polylines
}
