/// Rows and columns for roughly square pieces, given the image size and the
/// number of pieces asked for. Both are at least 1.
pub fn calculate_grid(width: u32, height: u32, pieces: u32) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (1, 1);
    }
    let aspect = width as f64 / height as f64;
    let rows = (pieces as f64 / aspect).sqrt() as u32;
    let cols = (pieces as f64 / rows.max(1) as f64) as u32;
    (rows.max(1), cols.max(1))
}

/// Pixel span `[start, end)` of cell `index` when `total` pixels are split
/// into `count` equal cells. Edges round to the nearest pixel, halves to
/// even, the same way PIL rounds a fractional crop box.
pub fn cell_span(index: u32, count: u32, total: u32) -> (u32, u32) {
    let size = total as f64 / count as f64;
    let start = (index as f64 * size).round_ties_even() as u32;
    let end = ((index + 1) as f64 * size).round_ties_even() as u32;
    (start.min(total), end.min(total))
}
