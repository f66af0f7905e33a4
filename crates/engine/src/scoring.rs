pub const PLACEMENT_POINTS: u32 = 10;
pub const LINE_POINTS: u32 = 100;

/// Points for one placement. Clearing `n` lines at once pays `100 * n * n`;
/// a placement that clears nothing pays a flat 10.
pub fn placement_points(lines: usize) -> u32 {
    if lines == 0 {
        return PLACEMENT_POINTS;
    }
    let n = lines as u32;
    LINE_POINTS * n * n
}
