// src/network/dominance.rs
//! Длины хвостов и выбор доминирующей ветви
//!
//! Для каждого узла кэшируются два значения: длина самого глубокого
//! хвоста под ним (лист = 1, внутренний узел = 1 + максимум по детям)
//! и индекс ребёнка, ведущего к этому максимуму. По этому индексу
//! экстрактор ведёт основное русло, а боковые ветви отрисовываются
//! отдельными линиями. При равных глубинах побеждает первый по порядку
//! вставки ребёнок.

use super::{NodeId, RiverForest};

/// Пересчитывает длины хвостов и доминирующие индексы всего леса
pub fn refresh_tail_lengths(forest: &mut RiverForest) {
    let roots = forest.roots.clone();
    for root in roots {
        update_subtree(forest, root);
    }
}

/// Обновляет кэш поддерева и возвращает длину хвоста узла
pub(crate) fn update_subtree(forest: &mut RiverForest, node: NodeId) -> u32 {
    let child_count = forest.nodes[node].children.len();
    if child_count == 0 {
        forest.nodes[node].tail_length = 1;
        forest.nodes[node].dominant = 0;
        return 1;
    }

    let mut best = 0;
    let mut best_index = 0;
    for i in 0..child_count {
        let child = forest.nodes[node].children[i];
        let len = update_subtree(forest, child);
        // Строгое сравнение: при равенстве остаётся первый ребёнок
        if len > best {
            best = len;
            best_index = i;
        }
    }

    let tail = best + 1;
    forest.nodes[node].tail_length = tail;
    forest.nodes[node].dominant = best_index;
    tail
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::Point;

    fn chain(forest: &mut RiverForest, from: NodeId, points: &[(i32, i32)]) -> NodeId {
        let mut id = from;
        for &(x, y) in points {
            id = forest.push_child(Point::new(x, y), id);
        }
        id
    }

    #[test]
    fn leaf_tail_length_is_one() {
        let mut forest = RiverForest::new();
        forest.push_root(Point::new(0, 0));
        refresh_tail_lengths(&mut forest);
        assert_eq!(forest.node(forest.roots[0]).tail_length, 1);
    }

    #[test]
    fn chain_tail_lengths_decrease_downstream() {
        let mut forest = RiverForest::new();
        let root = forest.push_root(Point::new(0, 0));
        chain(&mut forest, root, &[(0, 1), (0, 2), (0, 3)]);
        refresh_tail_lengths(&mut forest);

        let lengths: Vec<u32> = forest.nodes.iter().map(|n| n.tail_length).collect();
        assert_eq!(lengths, vec![4, 3, 2, 1]);
    }

    #[test]
    fn dominant_child_leads_to_deepest_subtree() {
        let mut forest = RiverForest::new();
        let root = forest.push_root(Point::new(0, 0));
        let fork = forest.push_child(Point::new(0, 1), root);
        // Первая ветвь короче второй
        chain(&mut forest, fork, &[(1, 1)]);
        let long_start = forest.push_child(Point::new(0, 2), fork);
        chain(&mut forest, long_start, &[(0, 3), (0, 4)]);
        refresh_tail_lengths(&mut forest);

        let fork_node = forest.node(fork);
        assert_eq!(fork_node.dominant, 1);
        assert_eq!(fork_node.tail_length, 4);
        // Доминирующий ребёнок не мельче любого из братьев
        let dominant_tail = forest.node(fork_node.children[fork_node.dominant]).tail_length;
        for &child in &fork_node.children {
            assert!(forest.node(child).tail_length <= dominant_tail);
        }
    }

    #[test]
    fn equal_depths_keep_first_child() {
        let mut forest = RiverForest::new();
        let root = forest.push_root(Point::new(0, 0));
        chain(&mut forest, root, &[(1, 0)]);
        chain(&mut forest, root, &[(0, 1)]);
        refresh_tail_lengths(&mut forest);

        assert_eq!(forest.node(root).dominant, 0);
        assert_eq!(forest.node(root).tail_length, 2);
    }
}
