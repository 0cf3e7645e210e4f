// src/network/builder.rs
//! Построение леса речных деревьев
//!
//! Три прохода по источникам в фиксированном порядке, с одним общим
//! множеством посещённых клеток на весь запуск:
//!
//! 1. **Океанский**: речные клетки возле прибрежной суши; при наличии
//!    двухходового пути река → суша → океан корень ставится прямо в
//!    океанской клетке.
//! 2. **Озёрный**: каждая пара (озеро, прилегающая река) даёт
//!    собственное дерево с корнем в озёрной клетке.
//! 3. **Внутренний**: оставшиеся речные клетки; корень ищется локальной
//!    заливкой до тупика-истока. Компонента без тупика (замкнутый
//!    контур) — фатальная ошибка.
//!
//! Рост дерева общий для всех проходов: фронтир кандидатов
//! `клетка → родительский узел`; порядок выборки из фронтира не задан,
//! при повторном предложении той же клетки побеждает последняя запись.

use std::collections::{HashMap, HashSet, VecDeque};

use log::debug;

use super::{DIRECTIONS, NetworkError, NodeId, RiverForest, RiverNetwork};
use crate::terrain::{Point, TerrainMap, TerrainType};

/// Строит речную сеть по классифицированной сетке
///
/// # Ошибки
/// [`NetworkError::CyclicComponent`], если внутренняя речная компонента
/// не содержит ни одного тупика-истока.
pub fn build_network(map: &TerrainMap) -> Result<RiverNetwork, NetworkError> {
    let mut forest = RiverForest::new();
    let mut visited: HashSet<Point> = HashSet::new();

    // === 1. Инвентаризация океанов и озёр ===
    let mut oceans = Vec::new();
    let mut lakes = Vec::new();
    for y in 0..map.height {
        for x in 0..map.width {
            let pt = Point::new(x as i32, y as i32);
            match map.get(pt) {
                Some(TerrainType::Ocean) => oceans.push(pt),
                Some(TerrainType::Lake) => lakes.push(pt),
                _ => {}
            }
        }
    }

    // === 2. Деревья от океанских устьев ===
    ocean_pass(map, &mut forest, &mut visited, &oceans);
    let ocean_trees = forest.roots.len();

    // === 3. Деревья от озёрных истоков ===
    lake_pass(map, &mut forest, &mut visited, &lakes);
    let lake_trees = forest.roots.len() - ocean_trees;

    // === 4. Осиротевшие внутренние реки ===
    inland_pass(map, &mut forest, &mut visited)?;

    debug!(
        "сеть построена: {} деревьев ({} океанских, {} озёрных, {} внутренних), {} узлов",
        forest.roots.len(),
        ocean_trees,
        lake_trees,
        forest.roots.len() - ocean_trees - lake_trees,
        forest.nodes.len()
    );

    Ok(RiverNetwork {
        forest,
        oceans,
        lakes,
    })
}

/// Речные клетки, прилегающие к прибрежной суше, как истоки деревьев
fn ocean_pass(
    map: &TerrainMap,
    forest: &mut RiverForest,
    visited: &mut HashSet<Point>,
    oceans: &[Point],
) {
    // Суша, граничащая с океаном
    let mut coastal = Vec::new();
    for &pt in oceans {
        for &(dx, dy) in &DIRECTIONS {
            let n = pt.offset(dx, dy);
            if map.get(n).is_some_and(TerrainType::is_land) {
                coastal.push(n);
            }
        }
    }

    // Кандидаты-истоки: реки возле прибрежной суши, без дубликатов
    let mut seeds: HashSet<Point> = HashSet::new();
    for &pt in &coastal {
        for &(dx, dy) in &DIRECTIONS {
            let n = pt.offset(dx, dy);
            if map.is_river_at(n) {
                seeds.insert(n);
            }
        }
    }

    // Порядок обхода истоков не задан
    for &seed in &seeds {
        if !visited.insert(seed) {
            continue;
        }
        let start = if let Some((land, ocean)) = shore_path(map, seed) {
            // Синтетический корень в океане: океан → суша → река
            visited.insert(ocean);
            visited.insert(land);
            let root = forest.push_root(ocean);
            let mid = forest.push_child(land, root);
            forest.push_child(seed, mid)
        } else {
            forest.push_root(seed)
        };
        grow_tree(map, forest, visited, start);
    }
}

/// Двухходовый путь исток → суша → океан; первый найденный в порядке
/// [`DIRECTIONS`]
fn shore_path(map: &TerrainMap, seed: Point) -> Option<(Point, Point)> {
    for &(dx, dy) in &DIRECTIONS {
        let land = seed.offset(dx, dy);
        if !map.get(land).is_some_and(TerrainType::is_land) {
            continue;
        }
        for &(dx2, dy2) in &DIRECTIONS {
            let ocean = land.offset(dx2, dy2);
            if map.get(ocean) == Some(TerrainType::Ocean) {
                return Some((land, ocean));
            }
        }
    }
    None
}

/// Каждая пара (озеро, прилегающая непосещённая река) — отдельное дерево
fn lake_pass(
    map: &TerrainMap,
    forest: &mut RiverForest,
    visited: &mut HashSet<Point>,
    lakes: &[Point],
) {
    for &lake in lakes {
        for &(dx, dy) in &DIRECTIONS {
            let n = lake.offset(dx, dy);
            if !map.is_river_at(n) || visited.contains(&n) {
                continue;
            }
            visited.insert(n);
            visited.insert(lake);
            let root = forest.push_root(lake);
            let start = forest.push_child(n, root);
            grow_tree(map, forest, visited, start);
        }
    }
}

/// Сканирует сетку построчно; каждая непосещённая речная клетка
/// начинает поиск истока в своей компоненте
fn inland_pass(
    map: &TerrainMap,
    forest: &mut RiverForest,
    visited: &mut HashSet<Point>,
) -> Result<(), NetworkError> {
    for y in 0..map.height {
        for x in 0..map.width {
            let pt = Point::new(x as i32, y as i32);
            if !map.is_river_at(pt) || visited.contains(&pt) {
                continue;
            }
            let head = find_headwater(map, pt)?;
            visited.insert(head);
            let start = forest.push_root(head);
            grow_tree(map, forest, visited, start);
        }
    }
    Ok(())
}

/// Ищет тупик-исток в компоненте связных речных клеток
///
/// Локальная заливка со своим множеством посещённого (глобальное не
/// участвует). Истоком считается первая достигнутая клетка, у которой
/// не больше одного речного соседа. В замкнутом контуре таких клеток
/// нет — заливка исчерпывается, и компонента признаётся циклической.
fn find_headwater(map: &TerrainMap, start: Point) -> Result<Point, NetworkError> {
    let mut seen: HashSet<Point> = HashSet::from([start]);
    let mut queue: VecDeque<Point> = VecDeque::from([start]);

    while let Some(pt) = queue.pop_front() {
        if river_degree(map, pt) <= 1 {
            return Ok(pt);
        }
        for &(dx, dy) in &DIRECTIONS {
            let n = pt.offset(dx, dy);
            if map.is_river_at(n) && seen.insert(n) {
                queue.push_back(n);
            }
        }
    }

    Err(NetworkError::CyclicComponent(start))
}

/// Число речных соседей клетки
fn river_degree(map: &TerrainMap, pt: Point) -> usize {
    DIRECTIONS
        .iter()
        .filter(|&&(dx, dy)| map.is_river_at(pt.offset(dx, dy)))
        .count()
}

/// Растит дерево от узла `start` заливкой по фронтиру
///
/// Фронтир отображает клетку-кандидата в узел, который станет её
/// родителем. Озеро присоединяется терминальным листом (рукав в озеро)
/// и дальше не растёт; не-вода отбрасывается без узла.
fn grow_tree(map: &TerrainMap, forest: &mut RiverForest, visited: &mut HashSet<Point>, start: NodeId) {
    let mut frontier: HashMap<Point, NodeId> = HashMap::new();
    let base = forest.node(start).center;
    for &(dx, dy) in &DIRECTIONS {
        frontier.insert(base.offset(dx, dy), start);
    }

    loop {
        // Порядок выборки не задан
        let Some((&pt, &parent)) = frontier.iter().next() else {
            break;
        };
        frontier.remove(&pt);

        if !visited.insert(pt) {
            continue;
        }
        match map.get(pt) {
            Some(TerrainType::Lake) => {
                // Терминальный лист: рукав, впадающий в озеро
                forest.push_child(pt, parent);
            }
            Some(t) if t.is_river() => {
                let node = forest.push_child(pt, parent);
                for &(dx, dy) in &DIRECTIONS {
                    let n = pt.offset(dx, dy);
                    let wet = map
                        .get(n)
                        .is_some_and(|t| t.is_river() || t == TerrainType::Lake);
                    if wet && !visited.contains(&n) {
                        // Последняя запись затирает прежнего родителя
                        frontier.insert(n, node);
                    }
                }
            }
            _ => {} // не вода — ветка обрывается без узла
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Центры всех узлов леса, являющиеся речными клетками карты
    fn river_centers(map: &TerrainMap, forest: &RiverForest) -> Vec<Point> {
        forest
            .nodes
            .iter()
            .map(|n| n.center)
            .filter(|&p| map.is_river_at(p))
            .collect()
    }

    #[test]
    fn ocean_estuary_builds_rooted_chain() {
        // Океан (0,2), суша (1,2), ручей столбиком (2,0)-(2,2)
        let map = TerrainMap::from_rows(&[
            "..b..",
            "..b..",
            "~.b..",
            ".....",
            ".....",
        ]);
        let network = build_network(&map).unwrap();
        let forest = &network.forest;

        assert_eq!(forest.roots.len(), 1);
        assert_eq!(network.oceans, vec![Point::new(0, 2)]);

        // Цепочка океан → суша → река вниз до истока
        let mut id = forest.roots[0];
        let mut chain = vec![forest.node(id).center];
        while let Some(&child) = forest.node(id).children.first() {
            assert_eq!(forest.node(id).children.len(), 1);
            assert_eq!(forest.node(child).parent, Some(id));
            chain.push(forest.node(child).center);
            id = child;
        }
        assert_eq!(
            chain,
            vec![
                Point::new(0, 2),
                Point::new(1, 2),
                Point::new(2, 2),
                Point::new(2, 1),
                Point::new(2, 0),
            ]
        );
    }

    #[test]
    fn lake_with_two_inlets_yields_two_trees() {
        let map = TerrainMap::from_rows(&[
            "lb.",
            "b..",
            "...",
        ]);
        let network = build_network(&map).unwrap();
        let forest = &network.forest;

        assert_eq!(forest.roots.len(), 2);
        for &root in &forest.roots {
            assert_eq!(forest.node(root).center, Point::new(0, 0));
            assert_eq!(forest.node(root).children.len(), 1);
        }
        let inlets: HashSet<Point> = forest
            .roots
            .iter()
            .map(|&r| forest.node(forest.node(r).children[0]).center)
            .collect();
        assert_eq!(
            inlets,
            HashSet::from([Point::new(1, 0), Point::new(0, 1)])
        );
    }

    #[test]
    fn inland_component_roots_at_dead_end() {
        let map = TerrainMap::from_rows(&[
            ".....",
            ".bbb.",
            ".....",
        ]);
        let network = build_network(&map).unwrap();
        let forest = &network.forest;

        assert_eq!(forest.roots.len(), 1);
        let root = forest.node(forest.roots[0]);
        // Исток — тупик с одним речным соседом
        assert_eq!(river_degree(&map, root.center), 1);
        assert_eq!(forest.nodes.len(), 3);
    }

    #[test]
    fn isolated_single_tile_river_is_single_node_tree() {
        let map = TerrainMap::from_rows(&[
            "...",
            ".b.",
            "...",
        ]);
        let network = build_network(&map).unwrap();
        assert_eq!(network.forest.roots.len(), 1);
        assert_eq!(network.forest.nodes.len(), 1);
        assert_eq!(
            network.forest.node(network.forest.roots[0]).center,
            Point::new(1, 1)
        );
    }

    #[test]
    fn closed_loop_is_fatal() {
        // Замкнутый контур без тупика
        let map = TerrainMap::from_rows(&[
            "bb",
            "bb",
        ]);
        let err = build_network(&map).unwrap_err();
        assert!(matches!(err, NetworkError::CyclicComponent(_)));
    }

    #[test]
    fn distributary_lake_attaches_as_leaf() {
        let map = TerrainMap::from_rows(&["~.bbl"]);
        let network = build_network(&map).unwrap();
        let forest = &network.forest;

        // Озеро не порождает собственного дерева: его приток уже занят
        assert_eq!(forest.roots.len(), 1);
        assert_eq!(forest.nodes.len(), 5);
        let lake = forest
            .nodes
            .iter()
            .find(|n| n.center == Point::new(4, 0))
            .unwrap();
        assert!(lake.children.is_empty());
        assert_eq!(network.lakes, vec![Point::new(4, 0)]);
    }

    #[test]
    fn river_tiles_partition_across_trees() {
        // Смешанная карта: устье в океан, развилка, озеро и отдельная
        // внутренняя компонента
        let map = TerrainMap::from_rows(&[
            "~.bb..b",
            "~..b..b",
            "~.sb...",
            "~......",
            "~..l...",
            "~..b...",
        ]);
        let network = build_network(&map).unwrap();
        let forest = &network.forest;

        let mut expected: Vec<Point> = Vec::new();
        for y in 0..map.height {
            for x in 0..map.width {
                let pt = Point::new(x as i32, y as i32);
                if map.is_river_at(pt) {
                    expected.push(pt);
                }
            }
        }

        let mut actual = river_centers(&map, forest);
        actual.sort();
        let deduped: HashSet<Point> = actual.iter().copied().collect();
        // Каждая речная клетка — ровно в одном дереве
        assert_eq!(actual.len(), deduped.len(), "клетка попала в два дерева");
        expected.sort();
        assert_eq!(actual, expected);
    }
}
