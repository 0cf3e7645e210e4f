// src/network/mod.rs
//! Речная сеть: дерево стоков поверх классифицированной сетки
//!
//! Ядро всей программы. Из неупорядоченного множества речных клеток
//! собирается лес корневых деревьев:
//!
//! 1. **`builder`** — три прохода по источникам (океанские устья,
//!    озёрные истоки, осиротевшие внутренние реки) с общим множеством
//!    посещённых клеток; каждая речная клетка попадает ровно в одно дерево.
//! 2. **`dominance`** — для каждого узла считается длина хвоста и
//!    индекс доминирующей ветви (самой глубокой).
//! 3. **`smooth`** — координаты узлов переносятся с центров клеток на
//!    середины общих границ, чтобы кривые чисто проходили через стыки.
//! 4. **`extract`** — лес разбирается на ломаные: по одной на каждый
//!    максимальный доминирующий ствол, боковые ветви отделяются в
//!    самостоятельные ломаные от точки развилки.
//!
//! Узлы хранятся в арене ([`RiverForest::nodes`]): владение выражено
//! списками детей по индексам, обратная ссылка на родителя — такой же
//! индекс без владения, циклов владения нет.

pub mod builder;
pub mod dominance;
pub mod extract;
pub mod smooth;

pub use builder::build_network;
pub use dominance::refresh_tail_lengths;
pub use extract::{Polyline, extract_polylines};
pub use smooth::smooth_junctions;

use crate::terrain::Point;
use thiserror::Error;

/// Индекс узла в арене леса
pub type NodeId = usize;

/// Соседи по фон Нейману: верх, низ, лево, право
pub const DIRECTIONS: [(i32, i32); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];

/// Фатальные ошибки построения сети
#[derive(Debug, Error)]
pub enum NetworkError {
    /// Внутренняя речная компонента без единого тупика — замкнутый контур
    #[error("cyclic river component with no headwater, entered at {0}")]
    CyclicComponent(Point),

    /// Родитель и ребёнок не соседствуют по одной оси — порча геометрии
    /// (недостижимо при корректном построении по 4-связности)
    #[error("river nodes {0} and {1} are not 4-adjacent")]
    BrokenAdjacency(Point, Point),
}

/// Узел речного дерева
///
/// Дети упорядочены порядком вставки — этот порядок и есть индекс ветви
/// при выборе доминирующего ствола.
#[derive(Debug, Clone)]
pub struct RiverNode {
    /// Центр клетки (задан всегда)
    pub center: Point,
    /// Середина границы с родительской клеткой; назначается сглаживанием
    /// и только узлам, не являющимся корнями или развилками
    pub edge: Option<(f32, f32)>,
    /// Дети в порядке вставки (владеющие ссылки-индексы)
    pub children: Vec<NodeId>,
    /// Невладеющая обратная ссылка на родителя
    pub parent: Option<NodeId>,
    /// Кэш длины самого глубокого хвоста (лист = 1)
    pub tail_length: u32,
    /// Индекс ребёнка, ведущего к самому глубокому хвосту
    pub dominant: usize,
}

impl RiverNode {
    #[must_use]
    pub fn new(center: Point) -> Self {
        Self {
            center,
            edge: None,
            children: Vec::new(),
            parent: None,
            tail_length: 1,
            dominant: 0,
        }
    }

    /// Точка, по которой узел рисуется: середина границы при включённом
    /// сглаживании, иначе центр клетки
    #[must_use]
    pub fn vertex(&self, smoothing: bool) -> (f32, f32) {
        let center = (self.center.x as f32, self.center.y as f32);
        if smoothing {
            self.edge.unwrap_or(center)
        } else {
            center
        }
    }
}

/// Лес речных деревьев: арена узлов плюс упорядоченный список корней
///
/// Порядок корней повторяет порядок обработки источников: сначала
/// океанские, затем озёрные, затем внутренние.
#[derive(Debug, Clone, Default)]
pub struct RiverForest {
    pub nodes: Vec<RiverNode>,
    pub roots: Vec<NodeId>,
}

impl RiverForest {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Добавляет новый корень
    pub fn push_root(&mut self, center: Point) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(RiverNode::new(center));
        self.roots.push(id);
        id
    }

    /// Добавляет ребёнка под `parent`
    pub fn push_child(&mut self, center: Point, parent: NodeId) -> NodeId {
        let id = self.nodes.len();
        let mut node = RiverNode::new(center);
        node.parent = Some(parent);
        self.nodes.push(node);
        self.nodes[parent].children.push(id);
        id
    }

    /// Синтетический узел для отделённой ветви: не корень и не ребёнок,
    /// живёт только в рабочем списке экстрактора
    pub(crate) fn push_detached(&mut self, center: Point, edge: Option<(f32, f32)>) -> NodeId {
        let id = self.nodes.len();
        let mut node = RiverNode::new(center);
        node.edge = edge;
        self.nodes.push(node);
        id
    }

    #[must_use]
    pub fn node(&self, id: NodeId) -> &RiverNode {
        &self.nodes[id]
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

/// Результат построения сети: лес плюс сырые списки клеток океана и озёр
/// для наложения слоёв при отрисовке
#[derive(Debug, Clone)]
pub struct RiverNetwork {
    pub forest: RiverForest,
    pub oceans: Vec<Point>,
    pub lakes: Vec<Point>,
}
