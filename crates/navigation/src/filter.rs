use tillpoint_auth::PermissionEvaluator;

use crate::NavItem;

/// The part of `tree` the evaluator's identity may see.
///
/// Administrators get the tree unchanged. An item with sub-items is kept with
/// only its granted sub-items; when none are granted it survives childless if
/// its own permission is granted. Source order is preserved throughout.
pub fn filter_navigation<E>(tree: &[NavItem], evaluator: &E) -> Vec<NavItem>
where
    E: PermissionEvaluator + ?Sized,
{
    if evaluator.is_admin() {
        return tree.to_vec();
    }

    tree.iter()
        .filter_map(|item| filter_item(item, evaluator))
        .collect()
}

fn filter_item<E>(item: &NavItem, evaluator: &E) -> Option<NavItem>
where
    E: PermissionEvaluator + ?Sized,
{
    if !item.has_children() {
        return evaluator.has(&item.permission).then(|| item.clone());
    }

    let children: Vec<NavItem> = item
        .children
        .iter()
        .filter(|child| evaluator.has(&child.permission))
        .cloned()
        .collect();

    if !children.is_empty() {
        Some(NavItem {
            children,
            ..item.clone()
        })
    } else if evaluator.has(&item.permission) {
        Some(NavItem {
            children: Vec::new(),
            ..item.clone()
        })
    } else {
        None
    }
}
