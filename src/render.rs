use crate::config::Settings;
use crate::controls::Param;
use crate::model::{GameState, Scene};
use crate::playback::Phase;
use crate::trajectory::{
    letter_center_x, Point, ALPHABET, GROUND_Y, LANDING_TOLERANCE, VIEW_HEIGHT, VIEW_WIDTH,
};
use crossterm::{
    cursor,
    execute, queue,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal::{
        self, BeginSynchronizedUpdate, Clear, ClearType, DisableLineWrap, EnableLineWrap,
        EndSynchronizedUpdate, EnterAlternateScreen, LeaveAlternateScreen,
    },
};
use std::io::{self, Write};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Cell {
    pub(crate) ch: char,
    pub(crate) fg: Color,
    pub(crate) bg: Color,
    pub(crate) bold: bool,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: Color::White,
            bg: Color::Black,
            bold: false,
        }
    }
}

pub(crate) struct CellBuffer {
    pub(crate) w: u16,
    pub(crate) h: u16,
    pub(crate) cells: Vec<Cell>,
}

impl CellBuffer {
    pub(crate) fn new(w: u16, h: u16) -> Self {
        Self {
            w,
            h,
            cells: vec![Cell::default(); (w as usize) * (h as usize)],
        }
    }
    pub(crate) fn idx(&self, x: u16, y: u16) -> usize {
        (y as usize) * (self.w as usize) + (x as usize)
    }
    pub(crate) fn set(&mut self, x: u16, y: u16, c: Cell) {
        if x < self.w && y < self.h {
            let i = self.idx(x, y);
            self.cells[i] = c;
        }
    }
    pub(crate) fn get_mut(&mut self, x: u16, y: u16) -> Option<&mut Cell> {
        if x < self.w && y < self.h {
            let i = self.idx(x, y);
            Some(&mut self.cells[i])
        } else {
            None
        }
    }
    pub(crate) fn clear(&mut self, bg: Color) {
        self.cells.fill(Cell {
            bg,
            ..Cell::default()
        });
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Pixel {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: u8,
}

impl Pixel {
    const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

const GRID: Pixel = Pixel::rgba(110, 110, 120, 70);
const AXIS: Pixel = Pixel::rgba(225, 225, 225, 255);
const TICK: Pixel = Pixel::rgba(180, 180, 180, 230);
const HILITE: Pixel = Pixel::rgba(255, 64, 64, 255);
const PATH: Pixel = Pixel::rgba(59, 130, 246, 220);
const SHOT: Pixel = Pixel::rgba(255, 70, 70, 200);

pub(crate) struct PixelCanvas {
    pub(crate) w: u32,
    pub(crate) h: u32,
    pub(crate) px: Vec<Pixel>,
}

impl PixelCanvas {
    pub(crate) fn new(w: u32, h: u32) -> Self {
        Self {
            w,
            h,
            px: vec![Pixel::default(); (w as usize) * (h as usize)],
        }
    }
    pub(crate) fn idx(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.w as usize) + (x as usize)
    }
    pub(crate) fn clear(&mut self) {
        self.px.fill(Pixel::default());
    }
    fn blend_over(&mut self, x: i32, y: i32, src: Pixel) {
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as u32, y as u32);
        if x >= self.w || y >= self.h {
            return;
        }
        let i = self.idx(x, y);
        let dst = self.px[i];

        let sa = src.a as f32 / 255.0;
        let da = dst.a as f32 / 255.0;

        let out_a = sa + da * (1.0 - sa);
        if out_a <= 1e-6 {
            self.px[i] = Pixel::default();
            return;
        }

        let blend = |sc: u8, dc: u8| -> u8 {
            let sc = sc as f32 / 255.0;
            let dc = dc as f32 / 255.0;
            let out = (sc * sa + dc * da * (1.0 - sa)) / out_a;
            (out.clamp(0.0, 1.0) * 255.0 + 0.5) as u8
        };

        self.px[i] = Pixel {
            r: blend(src.r, dst.r),
            g: blend(src.g, dst.g),
            b: blend(src.b, dst.b),
            a: (out_a.clamp(0.0, 1.0) * 255.0 + 0.5) as u8,
        };
    }
}

pub(crate) struct Terminal {
    pub(crate) out: io::Stdout,
    pub(crate) cols: u16,
    pub(crate) rows: u16,
    pub(crate) prev: CellBuffer,
    pub(crate) cur: CellBuffer,
    pub(crate) canvas: PixelCanvas,
}

impl Terminal {
    pub(crate) fn begin() -> anyhow::Result<Self> {
        let mut out = io::stdout();
        execute!(
            out,
            EnterAlternateScreen,
            cursor::Hide,
            DisableLineWrap,
            terminal::Clear(ClearType::All)
        )?;
        terminal::enable_raw_mode()?;

        let (cols, rows) = terminal::size()?;

        // Braille: 2×4 pixels per cell
        Ok(Self {
            out,
            cols,
            rows,
            prev: CellBuffer::new(cols, rows),
            cur: CellBuffer::new(cols, rows),
            canvas: PixelCanvas::new(cols as u32 * 2, rows as u32 * 4),
        })
    }

    pub(crate) fn end(&mut self) -> anyhow::Result<()> {
        queue!(
            self.out,
            BeginSynchronizedUpdate,
            ResetColor,
            SetAttribute(Attribute::Reset),
            Clear(ClearType::All),
            cursor::Show,
            EnableLineWrap,
            EndSynchronizedUpdate,
            LeaveAlternateScreen
        )?;
        self.out.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    pub(crate) fn resize_if_needed(&mut self) -> anyhow::Result<bool> {
        let (c, r) = terminal::size()?;
        if c == self.cols && r == self.rows {
            return Ok(false);
        }
        self.cols = c;
        self.rows = r;
        self.prev = CellBuffer::new(c, r);
        self.cur = CellBuffer::new(c, r);
        self.canvas = PixelCanvas::new(c as u32 * 2, r as u32 * 4);
        queue!(self.out, Clear(ClearType::All))?;
        Ok(true)
    }

    pub(crate) fn present(&mut self) -> anyhow::Result<()> {
        queue!(self.out, BeginSynchronizedUpdate)?;

        let mut last_fg = None;
        let mut last_bg = None;
        let mut last_bold = None;

        for y in 0..self.rows {
            for x in 0..self.cols {
                let i = self.cur.idx(x, y);
                let c = self.cur.cells[i];
                if c == self.prev.cells[i] {
                    continue;
                }

                queue!(self.out, cursor::MoveTo(x, y))?;

                if last_bold != Some(c.bold) {
                    let attr = if c.bold {
                        Attribute::Bold
                    } else {
                        Attribute::NormalIntensity
                    };
                    queue!(self.out, SetAttribute(attr))?;
                    last_bold = Some(c.bold);
                }
                if last_fg != Some(c.fg) {
                    queue!(self.out, SetForegroundColor(c.fg))?;
                    last_fg = Some(c.fg);
                }
                if last_bg != Some(c.bg) {
                    queue!(self.out, SetBackgroundColor(c.bg))?;
                    last_bg = Some(c.bg);
                }

                queue!(self.out, Print(c.ch))?;
            }
        }

        queue!(self.out, ResetColor, EndSynchronizedUpdate)?;
        self.out.flush()?;
        self.prev.cells.copy_from_slice(&self.cur.cells);
        Ok(())
    }
}

/* -----------------------------
   Braille encoding: 2×4 pixels -> U+2800..U+28FF
------------------------------ */

fn braille_bit(dx: u32, dy: u32) -> u8 {
    // Dot mapping:
    // (0,0)=1 (0,1)=2 (0,2)=4 (0,3)=64
    // (1,0)=8 (1,1)=16 (1,2)=32 (1,3)=128
    match (dx, dy) {
        (0, 0) => 0x01,
        (0, 1) => 0x02,
        (0, 2) => 0x04,
        (0, 3) => 0x40,
        (1, 0) => 0x08,
        (1, 1) => 0x10,
        (1, 2) => 0x20,
        (1, 3) => 0x80,
        _ => 0x00,
    }
}

/// Converts inked canvas pixels to braille glyphs. Cells with no ink are
/// left untouched so text drawn earlier survives.
pub(crate) fn canvas_to_cells(canvas: &PixelCanvas, out: &mut CellBuffer, enable_color: bool) {
    let cols = out.w as u32;
    let rows = out.h as u32;

    for cy in 0..rows {
        for cx in 0..cols {
            let px0 = cx * 2;
            let py0 = cy * 4;

            let mut mask: u8 = 0;
            let mut sum_r: u32 = 0;
            let mut sum_g: u32 = 0;
            let mut sum_b: u32 = 0;
            let mut ink_count: u32 = 0;

            for dy in 0..4 {
                for dx in 0..2 {
                    let x = px0 + dx;
                    let y = py0 + dy;
                    if x >= canvas.w || y >= canvas.h {
                        continue;
                    }
                    let p = canvas.px[canvas.idx(x, y)];

                    // threshold: treat alpha as ink
                    if p.a >= 32 {
                        mask |= braille_bit(dx, dy);
                        sum_r += p.r as u32;
                        sum_g += p.g as u32;
                        sum_b += p.b as u32;
                        ink_count += 1;
                    }
                }
            }
            if ink_count == 0 {
                continue;
            }

            let ch = char::from_u32(0x2800 + (mask as u32)).unwrap_or(' ');
            let fg = if enable_color {
                Color::Rgb {
                    r: (sum_r / ink_count) as u8,
                    g: (sum_g / ink_count) as u8,
                    b: (sum_b / ink_count) as u8,
                }
            } else {
                Color::White
            };

            if let Some(cell) = out.get_mut(cx as u16, cy as u16) {
                cell.ch = ch;
                cell.fg = fg;
            }
        }
    }
}

/* -----------------------------
   Chart geometry
------------------------------ */

/// Cell rectangle the chart occupies. Maps virtual coordinates to braille
/// sub-pixels or to whole cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct ChartArea {
    pub(crate) col: u16,
    pub(crate) row: u16,
    pub(crate) cols: u16,
    pub(crate) rows: u16,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Viewport {
    pub(crate) x: i32,
    pub(crate) y: i32,
    pub(crate) w: i32,
    pub(crate) h: i32,
}

impl Viewport {
    fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && y >= self.y && x < self.x + self.w && y < self.y + self.h
    }

    /// Virtual point -> position inside this viewport. May fall outside it.
    pub(crate) fn map(&self, p: Point) -> (i32, i32) {
        let x = self.x as f64 + p.x / VIEW_WIDTH * (self.w - 1).max(0) as f64;
        let y = self.y as f64 + p.y / VIEW_HEIGHT * (self.h - 1).max(0) as f64;
        (x.round() as i32, y.round() as i32)
    }
}

impl ChartArea {
    pub(crate) fn subpx(&self) -> Viewport {
        Viewport {
            x: self.col as i32 * 2,
            y: self.row as i32 * 4,
            w: self.cols as i32 * 2,
            h: self.rows as i32 * 4,
        }
    }

    pub(crate) fn cells(&self) -> Viewport {
        Viewport {
            x: self.col as i32,
            y: self.row as i32,
            w: self.cols as i32,
            h: self.rows as i32,
        }
    }

    /// Cell holding `p`, if it is on the chart.
    pub(crate) fn cell_of(&self, p: Point) -> Option<(u16, u16)> {
        let vp = self.cells();
        let (x, y) = vp.map(p);
        vp.contains(x, y).then_some((x as u16, y as u16))
    }
}

pub(crate) const FORM_ROWS: u16 = 8;
const FOOTER_ROWS: u16 = 2;
pub(crate) const MIN_COLS: u16 = 40;
pub(crate) const MIN_ROWS: u16 = FORM_ROWS + FOOTER_ROWS + 6;

pub(crate) fn chart_area(cols: u16, rows: u16) -> Option<ChartArea> {
    if cols < MIN_COLS || rows < MIN_ROWS {
        return None;
    }
    Some(ChartArea {
        col: 1,
        row: FORM_ROWS,
        cols: cols - 2,
        rows: rows - FORM_ROWS - FOOTER_ROWS,
    })
}

/* -----------------------------
   Chart drawing (braille)
------------------------------ */

struct Plot<'a> {
    canvas: &'a mut PixelCanvas,
    vp: Viewport,
}

impl Plot<'_> {
    fn dot(&mut self, x: i32, y: i32, p: Pixel) {
        if self.vp.contains(x, y) {
            self.canvas.blend_over(x, y, p);
        }
    }

    fn line(&mut self, a: (i32, i32), b: (i32, i32), p: Pixel) {
        let (mut x0, mut y0) = a;
        let (x1, y1) = b;
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.dot(x0, y0, p);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    fn disc(&mut self, c: (i32, i32), r: i32, p: Pixel) {
        for y in -r..=r {
            for x in -r..=r {
                if x * x + y * y <= r * r {
                    self.dot(c.0 + x, c.1 + y, p);
                }
            }
        }
    }

    fn vpoint(&self, x: f64, y: f64) -> (i32, i32) {
        self.vp.map(Point::new(x, y))
    }
}

pub(crate) fn draw_chart_braille(canvas: &mut PixelCanvas, area: ChartArea, st: &GameState) {
    let mut plot = Plot {
        canvas,
        vp: area.subpx(),
    };

    // grid intersections every 40 units above the ground
    let mut gy = 0.0;
    while gy < GROUND_Y {
        let mut gx = 0.0;
        while gx <= VIEW_WIDTH {
            let (x, y) = plot.vpoint(gx, gy);
            plot.dot(x, y, GRID);
            gx += 40.0;
        }
        gy += 40.0;
    }

    // axes
    let g0 = plot.vpoint(0.0, GROUND_Y);
    let g1 = plot.vpoint(VIEW_WIDTH, GROUND_Y);
    plot.line(g0, g1, AXIS);
    let a0 = plot.vpoint(10.0, 0.0);
    let a1 = plot.vpoint(10.0, GROUND_Y);
    plot.line(a0, a1, AXIS);

    let selected = highlighted_letter(st);
    for (i, c) in ALPHABET.iter().enumerate() {
        let x = letter_center_x(i);
        let top = plot.vpoint(x, GROUND_Y - LANDING_TOLERANCE / 2.0);
        let bottom = plot.vpoint(x, GROUND_Y + LANDING_TOLERANCE / 2.0);
        if selected == Some(*c) {
            plot.line(top, bottom, HILITE);
            plot.line((top.0 + 1, top.1), (bottom.0 + 1, bottom.1), HILITE);
            plot.disc(top, 1, HILITE);
        } else {
            plot.line(top, bottom, TICK);
        }
    }

    let path = st.playback.visible_path();
    for w in path.windows(2) {
        let a = plot.vp.map(w[0]);
        let b = plot.vp.map(w[1]);
        plot.line(a, b, PATH);
    }
    if let [only] = path {
        let p = plot.vp.map(*only);
        plot.dot(p.0, p.1, PATH);
    }

    if let Some(p) = st.playback.marker() {
        plot.disc(plot.vp.map(p), 2, SHOT);
    }
    if let Some(p) = st.playback.landing_marker() {
        let c = plot.vp.map(p);
        plot.disc(c, 3, Pixel { a: 90, ..HILITE });
        plot.disc(c, 1, HILITE);
    }
}

/* -----------------------------
   Chart drawing (plain cells)
------------------------------ */

pub(crate) fn draw_chart_ascii(buf: &mut CellBuffer, area: ChartArea, st: &GameState) {
    let bg = Color::Black;
    let vp = area.cells();

    let (_, ground_row) = vp.map(Point::new(0.0, GROUND_Y));
    for x in vp.x..vp.x + vp.w {
        put(buf, x, ground_row, '─', Color::White, bg, false);
    }
    let (axis_col, _) = vp.map(Point::new(10.0, 0.0));
    for y in vp.y..ground_row {
        put(buf, axis_col, y, '│', Color::White, bg, false);
    }
    put(buf, axis_col, ground_row, '┴', Color::White, bg, false);

    let selected = highlighted_letter(st);
    for (i, c) in ALPHABET.iter().enumerate() {
        if let Some((x, y)) = area.cell_of(Point::new(letter_center_x(i), GROUND_Y)) {
            let hot = selected == Some(*c);
            let fg = if hot { Color::Red } else { Color::Grey };
            put(buf, x as i32, y as i32, '┼', fg, bg, hot);
        }
    }

    for p in st.playback.visible_path() {
        if let Some((x, y)) = area.cell_of(*p) {
            put(buf, x as i32, y as i32, '·', Color::Blue, bg, false);
        }
    }
    if let Some((x, y)) = st.playback.marker().and_then(|p| area.cell_of(p)) {
        put(buf, x as i32, y as i32, 'o', Color::Red, bg, true);
    }
    if let Some((x, y)) = st.playback.landing_marker().and_then(|p| area.cell_of(p)) {
        put(buf, x as i32, y as i32, 'X', Color::Red, bg, true);
    }
}

fn put(buf: &mut CellBuffer, x: i32, y: i32, ch: char, fg: Color, bg: Color, bold: bool) {
    if x < 0 || y < 0 {
        return;
    }
    buf.set(x as u16, y as u16, Cell { ch, fg, bg, bold });
}

/// Tints the cell rows covering the landing band.
pub(crate) fn shade_landing_band(buf: &mut CellBuffer, area: ChartArea, enable_color: bool) {
    if !enable_color {
        return;
    }
    let vp = area.cells();
    let (_, top) = vp.map(Point::new(0.0, GROUND_Y - LANDING_TOLERANCE / 2.0));
    let (_, bottom) = vp.map(Point::new(0.0, GROUND_Y + LANDING_TOLERANCE / 2.0));
    for y in top..=bottom {
        for x in vp.x..vp.x + vp.w {
            if x < 0 || y < 0 {
                continue;
            }
            if let Some(cell) = buf.get_mut(x as u16, y as u16) {
                cell.bg = Color::Rgb {
                    r: 24,
                    g: 24,
                    b: 32,
                };
            }
        }
    }
}

/// Letter labels under the ground line.
pub(crate) fn draw_letter_labels(buf: &mut CellBuffer, area: ChartArea, st: &GameState) {
    let selected = highlighted_letter(st);
    for (i, c) in ALPHABET.iter().enumerate() {
        let Some((x, y)) = area.cell_of(Point::new(letter_center_x(i), 380.0)) else {
            continue;
        };
        let hot = selected == Some(*c);
        let fg = if hot { Color::Red } else { Color::Grey };
        buf.set(
            x,
            y,
            Cell {
                ch: *c,
                fg,
                bg: Color::Black,
                bold: hot,
            },
        );
    }
}

/// Only highlight once the shot has come down.
fn highlighted_letter(st: &GameState) -> Option<char> {
    if st.playback.is_playing() {
        return None;
    }
    st.session().last_letter()
}

/* -----------------------------
   Form panel (fields, sliders, buttons)
------------------------------ */

pub(crate) fn draw_text(buf: &mut CellBuffer, x: u16, y: u16, s: &str, fg: Color, bg: Color) {
    draw_styled(buf, x, y, s, fg, bg, false);
}

fn draw_styled(buf: &mut CellBuffer, x: u16, y: u16, s: &str, fg: Color, bg: Color, bold: bool) {
    for (i, ch) in s.chars().enumerate() {
        let xx = x.saturating_add(i as u16);
        if xx >= buf.w || y >= buf.h {
            break;
        }
        buf.set(xx, y, Cell { ch, fg, bg, bold });
    }
}

pub(crate) fn bar(value01: f32, width: usize) -> String {
    let v = value01.clamp(0.0, 1.0);
    let fill = (v * width as f32 + 0.5) as usize;
    let mut s = String::with_capacity(width + 2);
    s.push('[');
    for i in 0..width {
        s.push(if i < fill { '█' } else { '░' });
    }
    s.push(']');
    s
}

pub(crate) fn slider_line(param: Param, value: u8, selected: bool, locked: bool) -> String {
    let range = param.range();
    let (lo, hi) = (*range.start() as f32, *range.end() as f32);
    let t = (value as f32 - lo) / (hi - lo);
    format!(
        "{} {:<8}{} {:>3}  ({}){}",
        if selected { ">" } else { " " },
        param.label(),
        bar(t, 20),
        value,
        param.hint(),
        if locked { "  locked" } else { "" },
    )
}

pub(crate) fn ui_overlay(buf: &mut CellBuffer, st: &GameState) {
    let bg = Color::Black;
    let fg = Color::White;
    let dim = Color::DarkGrey;
    let hi = Color::Yellow;
    let playing = st.playback.is_playing();

    let title = format!(
        "Arcpass  |  Password Trajectory  |  {}",
        match st.playback.phase() {
            Phase::Idle => "ready",
            Phase::Playing => "in flight",
        }
    );
    draw_styled(buf, 1, 0, &title, fg, bg, true);

    let session = st.session();
    let editing = matches!(st.scene, Scene::EditUsername);
    let mut user = session.username().to_string();
    if editing {
        user.push('_');
    }
    let user_line = if user.is_empty() {
        "Username: (press u to enter)".to_string()
    } else {
        format!("Username: {user}")
    };
    draw_text(buf, 1, 1, &user_line, if editing { hi } else { fg }, bg);

    let pass_line = if session.password().is_empty() {
        "Password: (fire shots to set password)".to_string()
    } else {
        format!("Password: {}", session.password_display())
    };
    draw_text(buf, 1, 2, &pass_line, fg, bg);

    for (i, p) in Param::ALL.iter().enumerate() {
        let selected = st.selected == *p;
        let line = slider_line(*p, st.controls.get(*p), selected, playing);
        let color = match (playing, selected) {
            (true, _) => dim,
            (false, true) => hi,
            (false, false) => fg,
        };
        draw_text(buf, 1, 3 + i as u16, &line, color, bg);
    }

    let show_label = if session.show_password() {
        "[v] Hide"
    } else {
        "[v] Show"
    };
    let buttons: [(&str, bool); 4] = [
        ("[space] Launch!", !playing),
        ("[c] Clear", !playing),
        (show_label, !playing),
        ("[l] Login", true),
    ];
    let mut x = 1u16;
    for (label, enabled) in buttons {
        let color = if enabled { Color::Green } else { dim };
        draw_styled(buf, x, 6, label, color, bg, enabled);
        x = x.saturating_add(label.chars().count() as u16 + 3);
    }

    let footer_y = buf.h.saturating_sub(2);
    if let Some(c) = highlighted_letter(st) {
        let s = format!("Selected letter: {c}");
        draw_styled(buf, 1, footer_y, &s, Color::Red, bg, true);
    }
    if let Some(msg) = &st.status {
        let x = if highlighted_letter(st).is_some() { 24 } else { 1 };
        draw_text(buf, x, footer_y, msg, Color::Cyan, bg);
    }

    let help = match st.scene {
        Scene::Main => {
            "Keys: ↑↓ slider | ←→ adjust (shift ±10) | space launch | c clear | v show | u user | l login | h help | q quit"
        }
        Scene::Help => "Help: esc/h close | q quit",
        Scene::EditUsername => "Username: type | enter/esc done | backspace delete",
        Scene::LoginReport(_) => "Any key to continue",
    };
    draw_text(buf, 1, buf.h.saturating_sub(1), help, dim, bg);
}

/* -----------------------------
   Overlay boxes
------------------------------ */

pub(crate) fn draw_center_box(buf: &mut CellBuffer, title: &str, body: &str) {
    let bg = Color::Black;
    let fg = Color::White;
    let w = buf.w;
    let h = buf.h;

    let bw = 60.min(w.saturating_sub(4));
    let bh = 16.min(h.saturating_sub(4));
    if bw < 4 || bh < 4 {
        return;
    }
    let x0 = (w - bw) / 2;
    let y0 = (h - bh) / 2;
    let edge = |ch| Cell {
        ch,
        fg,
        bg,
        bold: false,
    };

    for y in y0..y0 + bh {
        for x in x0..x0 + bw {
            let on_top = y == y0;
            let on_bottom = y == y0 + bh - 1;
            let on_left = x == x0;
            let on_right = x == x0 + bw - 1;
            let ch = match (on_top, on_bottom, on_left, on_right) {
                (true, _, true, _) => '┌',
                (true, _, _, true) => '┐',
                (_, true, true, _) => '└',
                (_, true, _, true) => '┘',
                (true, _, _, _) | (_, true, _, _) => '─',
                (_, _, true, _) | (_, _, _, true) => '│',
                _ => ' ',
            };
            buf.set(x, y, edge(ch));
        }
    }

    draw_styled(buf, x0 + 2, y0 + 1, title, fg, bg, true);

    let inner = (bw - 4) as usize;
    let mut yy = y0 + 3;
    for line in body.lines() {
        if yy >= y0 + bh - 1 {
            break;
        }
        let clipped: String = line.chars().take(inner).collect();
        draw_text(buf, x0 + 2, yy, &clipped, fg, bg);
        yy += 1;
    }
}

pub(crate) fn draw_too_small(buf: &mut CellBuffer) {
    let msg = format!("Terminal too small (need {MIN_COLS}x{MIN_ROWS})");
    draw_text(buf, 0, 0, &msg, Color::White, Color::Black);
}

pub(crate) fn draw_frame(
    cur: &mut CellBuffer,
    canvas: &mut PixelCanvas,
    st: &GameState,
    settings: &Settings,
) {
    cur.clear(Color::Black);
    let Some(area) = chart_area(cur.w, cur.h) else {
        draw_too_small(cur);
        return;
    };

    shade_landing_band(cur, area, settings.enable_color);
    if settings.enable_braille {
        canvas.clear();
        draw_chart_braille(canvas, area, st);
        canvas_to_cells(canvas, cur, settings.enable_color);
    } else {
        draw_chart_ascii(cur, area, st);
    }
    draw_letter_labels(cur, area, st);
    ui_overlay(cur, st);

    match &st.scene {
        Scene::Help => draw_center_box(
            cur,
            "How to play",
            "Fire shots to spell a password, one letter per shot.\n\n\
             Power sets how far the shot travels.\n\
             Gravity flattens the arc.\n\
             Scale sets how high the arc peaks.\n\n\
             A shot that comes down on the ground strip picks the\n\
             letter below it. Overshoot the strip and nothing is added.\n\
             Lower power for letters near 'a', higher for 'z'.\n\n\
             Sliders, Clear and Show/Hide are locked mid-flight.",
        ),
        Scene::LoginReport(r) => {
            let body = format!(
                "Login attempt with\n\nusername: {}\npassword: {}\n\nat {}\n\nNothing was sent anywhere.",
                r.username,
                r.password,
                r.at.format("%Y-%m-%d %H:%M:%S")
            );
            draw_center_box(cur, "Login", &body);
        }
        Scene::Main | Scene::EditUsername => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controls::Controls;
    use std::time::{Duration, Instant};

    fn row_text(buf: &CellBuffer, y: u16) -> String {
        (0..buf.w).map(|x| buf.cells[buf.idx(x, y)].ch).collect()
    }

    #[test]
    fn bar_fills_proportionally() {
        assert_eq!(bar(0.0, 4), "[░░░░]");
        assert_eq!(bar(0.5, 4), "[██░░]");
        assert_eq!(bar(2.0, 4), "[████]");
    }

    #[test]
    fn slider_shows_value_hint_and_lock() {
        let s = slider_line(Param::Power, 100, true, true);
        assert!(s.starts_with("> Power"));
        assert!(s.contains("100"));
        assert!(s.contains("(distance)"));
        assert!(s.ends_with("locked"));
        assert!(slider_line(Param::Scale, 1, false, false).contains("[░░░░"));
    }

    #[test]
    fn chart_maps_ground_corners() {
        let area = chart_area(82, 30).unwrap();
        assert_eq!(area.cols, 80);
        assert_eq!(area.cell_of(Point::new(0.0, 0.0)), Some((1, FORM_ROWS)));
        let (x, _) = area.cell_of(Point::new(VIEW_WIDTH, GROUND_Y)).unwrap();
        assert_eq!(x, 80);
        assert_eq!(area.cell_of(Point::new(1500.0, GROUND_Y)), None);
        assert_eq!(area.cell_of(Point::new(500.0, -200.0)), None);
    }

    #[test]
    fn tiny_terminals_get_a_notice() {
        assert!(chart_area(20, 10).is_none());
        let mut buf = CellBuffer::new(50, 5);
        let mut canvas = PixelCanvas::new(100, 20);
        let st = GameState::new(Controls::default(), false, 60);
        draw_frame(&mut buf, &mut canvas, &st, &Settings::default());
        assert!(row_text(&buf, 0).starts_with("Terminal too small"));
    }

    #[test]
    fn frame_shows_masked_password_and_selected_letter() {
        let mut st = GameState::new(Controls::new(66, 50, 50).unwrap(), false, 60);
        let t0 = Instant::now();
        st.playback.launch(&st.controls, t0);
        for step in 0..=70 {
            st.tick(t0 + Duration::from_millis(step * 16));
        }

        let mut buf = CellBuffer::new(100, 30);
        let mut canvas = PixelCanvas::new(200, 120);
        let settings = Settings {
            enable_braille: false,
            ..Settings::default()
        };
        draw_frame(&mut buf, &mut canvas, &st, &settings);

        assert!(row_text(&buf, 2).contains("Password: *"));
        assert!(row_text(&buf, 28).contains("Selected letter: z"));
        // landing marker on the ground strip
        let area = chart_area(100, 30).unwrap();
        let (x, y) = area.cell_of(Point::new(990.0, GROUND_Y)).unwrap();
        assert_eq!(buf.cells[buf.idx(x, y)].ch, 'X');
    }

    #[test]
    fn braille_frame_inks_the_path() {
        let mut st = GameState::new(Controls::default(), true, 60);
        let t0 = Instant::now();
        st.playback.launch(&st.controls, t0);
        st.tick(t0 + Duration::from_millis(500));

        let mut buf = CellBuffer::new(100, 30);
        let mut canvas = PixelCanvas::new(200, 120);
        draw_frame(&mut buf, &mut canvas, &st, &Settings::default());

        let braille = buf
            .cells
            .iter()
            .filter(|c| ('\u{2801}'..='\u{28FF}').contains(&c.ch))
            .count();
        assert!(braille > 0);
        assert!(row_text(&buf, 0).contains("in flight"));
    }

    #[test]
    fn center_box_is_framed() {
        let mut buf = CellBuffer::new(80, 24);
        draw_center_box(&mut buf, "T", "hello");
        let x0 = (80 - 60) / 2;
        let y0 = (24 - 16) / 2;
        assert_eq!(buf.cells[buf.idx(x0, y0)].ch, '┌');
        assert_eq!(buf.cells[buf.idx(x0 + 59, y0 + 15)].ch, '┘');
        assert!(row_text(&buf, y0 + 3).contains("hello"));
    }
}
