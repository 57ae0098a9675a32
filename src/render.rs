use crate::guillotine::Bin;

const MAX_COLS: f64 = 78.0;
const MAX_ROWS: f64 = 38.0;

/// ASCII sketch of one bin: placed items framed and labelled by item id,
/// free rectangles filled with dots. Scaled down to a terminal-sized grid,
/// so tiny features can collapse; this is a debugging aid, not a to-scale
/// cutting diagram.
pub fn render_bin(bin: &Bin) -> String {
    let scale = f64::min(
        MAX_COLS / bin.size.w as f64,
        MAX_ROWS / bin.size.h as f64,
    )
    .min(1.0);
    let cols = (bin.size.w as f64 * scale).round() as usize;
    let rows = (bin.size.h as f64 * scale).round() as usize;
    if cols == 0 || rows == 0 {
        return String::new();
    }

    let mut grid = vec![vec![' '; cols + 1]; rows + 1];
    let to_cell = |v: u32| (v as f64 * scale).round() as usize;

    for f in &bin.free_rects {
        let (x, y) = (to_cell(f.x), to_cell(f.y));
        let (w, h) = (to_cell(f.rect.w), to_cell(f.rect.h));
        for row in grid.iter_mut().skip(y + 1).take(h.saturating_sub(1)) {
            for cell in row.iter_mut().skip(x + 1).take(w.saturating_sub(1)) {
                *cell = '.';
            }
        }
    }

    frame(&mut grid, 0, 0, cols, rows);
    for p in &bin.placed {
        let (x, y) = (to_cell(p.x), to_cell(p.y));
        let (w, h) = (to_cell(p.rect.w), to_cell(p.rect.h));
        if w == 0 || h == 0 {
            continue;
        }
        frame(&mut grid, x, y, w, h);
        label(&mut grid, x, y, w, h, &format!("#{}", p.item));
    }

    let mut out = format!("Bin {} ({}, cost {}):\n", bin.id, bin.size, bin.cost);
    // Row 0 is the bin's bottom edge; print top-down.
    for row in grid.iter().rev() {
        let line: String = row.iter().collect();
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

/// Draws a rectangle outline, joining with already-drawn edges: a cell that
/// carries a perpendicular edge becomes '+'.
fn frame(grid: &mut [Vec<char>], x: usize, y: usize, w: usize, h: usize) {
    let mut put = |gx: usize, gy: usize, ch: char| {
        let Some(cell) = grid.get_mut(gy).and_then(|row| row.get_mut(gx)) else {
            return;
        };
        *cell = match (*cell, ch) {
            ('|', '-') | ('-', '|') | ('+', _) => '+',
            _ => ch,
        };
    };

    for gx in x..=x + w {
        put(gx, y, '-');
        put(gx, y + h, '-');
    }
    for gy in y..=y + h {
        put(x, gy, '|');
        put(x + w, gy, '|');
    }
    for &gx in &[x, x + w] {
        for &gy in &[y, y + h] {
            put(gx, gy, '+');
        }
    }
}

fn label(grid: &mut [Vec<char>], x: usize, y: usize, w: usize, h: usize, text: &str) {
    let chars: Vec<char> = text.chars().collect();
    if w <= chars.len() || h < 2 {
        return;
    }
    let cy = y + h / 2;
    let cx = x + (w - chars.len()) / 2;
    for (i, &ch) in chars.iter().enumerate() {
        let gx = cx + i;
        if gx > x && gx < x + w && cy > y && cy < y + h {
            grid[cy][gx] = ch;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Item, Rect};

    #[test]
    fn test_render_single_item() {
        let mut bin = Bin::new(1, Rect::new(40, 20), 3);
        let mut item = Item::new(7, 40, 20);
        assert!(bin.try_insert(&mut item));
        let out = render_bin(&bin);
        assert!(out.starts_with("Bin 1 (40x20, cost 3):"));
        assert!(out.contains('+'));
        assert!(out.contains('-'));
        assert!(out.contains('|'));
        assert!(out.contains("#7"));
    }

    #[test]
    fn test_render_marks_free_space() {
        let mut bin = Bin::new(2, Rect::new(40, 20), 1);
        let mut item = Item::new(1, 10, 10);
        assert!(bin.try_insert(&mut item));
        let out = render_bin(&bin);
        assert!(out.contains('.'));
    }

    #[test]
    fn test_render_empty_bin() {
        let out = render_bin(&Bin::new(3, Rect::new(30, 30), 1));
        // Border plus dotted interior, nothing else.
        assert!(out.contains('+'));
        assert!(out.contains('.'));
        assert!(!out.contains('#'));
    }
}
