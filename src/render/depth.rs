/// Keep the `cap` entries nearest the eye (smallest depth) and order them
/// far to near for alpha blending.
pub(crate) fn nearest_back_to_front<T>(items: &mut Vec<(f32, T)>, cap: usize) {
    if items.len() > cap {
        if cap == 0 {
            items.clear();
            return;
        }
        items.select_nth_unstable_by(cap - 1, |a, b| a.0.total_cmp(&b.0));
        items.truncate(cap);
    }
    items.sort_by(|a, b| b.0.total_cmp(&a.0));
}
