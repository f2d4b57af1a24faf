use dg_core::frame::FrameBuffer;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Color;

/// Écrit une `FrameBuffer` quantizée directement dans un `ratatui::Buffer`
/// en half-blocks (caractère '▄').
///
/// Chaque cellule terminal couvre 2 pixels verticaux : le pixel du haut va
/// en bg, celui du bas en fg. Échantillonnage nearest quand les dimensions du
/// viewport et de la frame diffèrent — le quantizer aval a déjà réduit la
/// palette, tout filtrage serait détruit de toute façon.
///
/// Pas de widget Canvas ratatui — écriture directe pour zéro overhead.
pub fn render_frame(buf: &mut Buffer, area: Rect, frame: &FrameBuffer) {
    if area.width == 0 || area.height == 0 || frame.width == 0 || frame.height == 0 {
        return;
    }

    let pixel_w = u32::from(area.width);
    let pixel_h = u32::from(area.height) * 2;

    for cy in 0..area.height {
        for cx in 0..area.width {
            let px = u32::from(cx) * frame.width / pixel_w.max(1);
            let py_top = u32::from(cy) * 2 * frame.height / pixel_h.max(1);
            let py_bot = (u32::from(cy) * 2 + 1) * frame.height / pixel_h.max(1);

            let px = px.min(frame.width.saturating_sub(1));
            let py_top = py_top.min(frame.height.saturating_sub(1));
            let py_bot = py_bot.min(frame.height.saturating_sub(1));

            let (tr, tg, tb, _) = frame.pixel(px, py_top);
            let (br, bg, bb, _) = frame.pixel(px, py_bot);

            if let Some(cell) = buf.cell_mut((area.x + cx, area.y + cy)) {
                cell.set_char('▄');
                // sortie quantizée toujours opaque : fg ET bg sont posés
                cell.set_fg(Color::Rgb(br, bg, bb));
                cell.set_bg(Color::Rgb(tr, tg, tb));
            }
        }
    }
}

/// Zone d'affichage carrée centrée dans `area`.
///
/// Une cellule half-block vaut 1 pixel de large × 2 de haut, et une cellule
/// terminal fait environ 1:2 — une frame carrée occupe donc w = 2·h cellules.
#[must_use]
pub fn centered_square(area: Rect) -> Rect {
    let h = area.height.min(area.width / 2).max(1);
    let w = (h * 2).min(area.width).max(1);
    Rect {
        x: area.x + (area.width.saturating_sub(w)) / 2,
        y: area.y + (area.height.saturating_sub(h)) / 2,
        width: w,
        height: h,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dg_core::color::Rgb;

    #[test]
    fn halfblock_maps_top_to_bg_bottom_to_fg() {
        // 1×2 frame: red on top, blue on bottom → one cell
        let mut frame = FrameBuffer::new(1, 2);
        frame.set_pixel(0, 0, Rgb::new(1.0, 0.0, 0.0));
        frame.set_pixel(0, 1, Rgb::new(0.0, 0.0, 1.0));

        let area = Rect::new(0, 0, 1, 1);
        let mut buf = Buffer::empty(area);
        render_frame(&mut buf, area, &frame);

        let cell = buf.cell((0, 0)).unwrap();
        assert_eq!(cell.symbol(), "▄");
        assert_eq!(cell.fg, Color::Rgb(0, 0, 255));
        assert_eq!(cell.bg, Color::Rgb(255, 0, 0));
    }

    #[test]
    fn oversized_viewport_clamps_sampling() {
        let mut frame = FrameBuffer::new(2, 2);
        for y in 0..2 {
            for x in 0..2 {
                frame.set_pixel(x, y, Rgb::WHITE);
            }
        }
        let area = Rect::new(0, 0, 8, 8);
        let mut buf = Buffer::empty(area);
        render_frame(&mut buf, area, &frame);
        let cell = buf.cell((7, 7)).unwrap();
        assert_eq!(cell.fg, Color::Rgb(255, 255, 255));
    }

    #[test]
    fn empty_area_is_a_noop() {
        let frame = FrameBuffer::new(2, 2);
        let area = Rect::new(0, 0, 0, 0);
        let mut buf = Buffer::empty(Rect::new(0, 0, 4, 4));
        render_frame(&mut buf, area, &frame);
        assert_eq!(buf.cell((0, 0)).unwrap().symbol(), " ");
    }

    #[test]
    fn centered_square_fits_inside() {
        let area = Rect::new(0, 0, 80, 24);
        let sq = centered_square(area);
        assert!(sq.width <= area.width && sq.height <= area.height);
        assert!(sq.x >= area.x && sq.y >= area.y);
        assert_eq!(sq.height, 24);
    }
}
