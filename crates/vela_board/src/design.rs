//! The development board netlist.
//!
//! A 640×480 VGA colour-bar generator with a four-glyph text overlay, plus
//! five LEDs mirroring the reset line and push buttons. The design has two
//! clock domains: the board clock, divided by four into the pixel clock, and
//! the pixel clock itself. Both reset asynchronously on the falling edge of
//! the active-low `reset` input.

use vela_ir::{
    BinaryOp, CaseArm, Design, DesignBuilder, DesignError, EdgeSensitivity, Expr, SignalId,
    Statement,
};

/// Name of the character ROM the design reads.
pub const FONT_ROM: &str = "font";

/// Horizontal timing, in pixel clocks.
pub mod h {
    /// Sync pulse end.
    pub const SYNC: u64 = 96;
    /// First visible column.
    pub const VISIBLE_START: u64 = 144;
    /// One past the last visible column.
    pub const VISIBLE_END: u64 = 784;
    /// Total columns per line.
    pub const TOTAL: u64 = 800;
}

/// Vertical timing, in lines.
pub mod v {
    /// Sync pulse end.
    pub const SYNC: u64 = 2;
    /// First visible line.
    pub const VISIBLE_START: u64 = 35;
    /// One past the last visible line.
    pub const VISIBLE_END: u64 = 515;
    /// Total lines per frame.
    pub const TOTAL: u64 = 525;
}

/// The text overlay rectangle in pixel coordinates.
pub mod text {
    /// Left edge.
    pub const X: u64 = 256;
    /// Top edge.
    pub const Y: u64 = 224;
    /// Width: four 32-pixel glyphs.
    pub const WIDTH: u64 = 128;
    /// Height.
    pub const HEIGHT: u64 = 32;
}

/// RGB565 colours.
pub mod colour {
    /// Bar 0.
    pub const RED: u64 = 0xf800;
    /// Bar 1.
    pub const ORANGE: u64 = 0xfc00;
    /// Bar 2.
    pub const YELLOW: u64 = 0xffe0;
    /// Bar 3.
    pub const GREEN: u64 = 0x07e0;
    /// Bar 4.
    pub const CYAN: u64 = 0x07ff;
    /// Bar 5.
    pub const BLUE: u64 = 0x001f;
    /// Bar 6.
    pub const PURPLE: u64 = 0xf81f;
    /// Bar 7.
    pub const WHITE: u64 = 0xffff;
    /// Glyph pixels.
    pub const GOLDEN: u64 = 0xfec0;
    /// The eight bars, left to right.
    pub const BARS: [u64; 8] = [RED, ORANGE, YELLOW, GREEN, CYAN, BLUE, PURPLE, WHITE];
}

/// Width of each colour bar in pixels.
pub const BAR_WIDTH: u64 = 80;

/// Ids of the board's externally interesting signals.
#[derive(Debug, Clone, Copy)]
pub struct BoardSignals {
    /// Board clock.
    pub clk: SignalId,
    /// Active-low reset.
    pub reset: SignalId,
    /// Push buttons B2 to B5.
    pub buttons: [SignalId; 4],
    /// Horizontal sync.
    pub h_sync: SignalId,
    /// Vertical sync.
    pub v_sync: SignalId,
    /// RGB565 pixel.
    pub rgb: SignalId,
    /// LED1 to LED5.
    pub leds: [SignalId; 5],
    /// Pixel clock.
    pub vga_clk: SignalId,
    /// Column counter.
    pub cnt_h: SignalId,
    /// Line counter.
    pub cnt_v: SignalId,
    /// Registered pixel colour.
    pub pix_data: SignalId,
}

fn lit(value: u64, width: u32) -> Expr {
    Expr::lit(value, width)
}

fn sig(id: SignalId) -> Expr {
    Expr::signal(id)
}

/// `lo <= x && x < hi` on a 10-bit value.
fn within(x: SignalId, lo: u64, hi: u64) -> Expr {
    sig(x)
        .greater_eq(lit(lo, 10))
        .logic_and(sig(x).less_than(lit(hi, 10)))
}

/// Builds the board design.
pub fn build() -> Result<(Design, BoardSignals), DesignError> {
    let mut b = DesignBuilder::new();

    let clk = b.input("clk", 1)?;
    let reset = b.input("reset", 1)?;
    let buttons = [b.input("b2", 1)?, b.input("b3", 1)?, b.input("b4", 1)?, b.input("b5", 1)?];
    let h_sync = b.output("h_sync", 1)?;
    let v_sync = b.output("v_sync", 1)?;
    let rgb = b.output("rgb", 16)?;
    let leds = [
        b.output("led1", 1)?,
        b.output("led2", 1)?,
        b.output("led3", 1)?,
        b.output("led4", 1)?,
        b.output("led5", 1)?,
    ];

    // LEDs read inputs only.
    b.assign(leds[0], sig(reset));
    for (led, button) in leds[1..].iter().zip(buttons) {
        b.assign(*led, sig(button));
    }

    let reset_edges = |clock| vec![EdgeSensitivity::posedge(clock), EdgeSensitivity::negedge(reset)];
    let in_reset = sig(reset).logic_not();

    // Clock divider: vga_clk = clk / 4.
    let cnt = b.reg("pll.cnt", 1)?;
    let vga_clk = b.reg("pll.vga_clk", 1)?;
    b.clocked(
        "pll",
        reset_edges(clk),
        Statement::if_else(
            in_reset.clone(),
            Statement::block([
                Statement::nonblocking(cnt, lit(0, 1)),
                Statement::nonblocking(vga_clk, lit(0, 1)),
            ]),
            Statement::block([
                Statement::nonblocking(cnt, sig(cnt).not()),
                Statement::if_then(
                    sig(cnt).equals(lit(1, 1)),
                    Statement::nonblocking(vga_clk, sig(vga_clk).not()),
                ),
            ]),
        ),
    );

    // Sync counters.
    let cnt_h = b.reg("vga_ctrl.cnt_h", 10)?;
    let cnt_v = b.reg("vga_ctrl.cnt_v", 10)?;
    b.clocked(
        "vga_ctrl",
        reset_edges(vga_clk),
        Statement::if_else(
            in_reset.clone(),
            Statement::block([
                Statement::nonblocking(cnt_h, lit(0, 10)),
                Statement::nonblocking(cnt_v, lit(0, 10)),
            ]),
            Statement::if_else(
                sig(cnt_h).equals(lit(h::TOTAL - 1, 10)),
                Statement::block([
                    Statement::nonblocking(cnt_h, lit(0, 10)),
                    Statement::if_else(
                        sig(cnt_v).equals(lit(v::TOTAL - 1, 10)),
                        Statement::nonblocking(cnt_v, lit(0, 10)),
                        Statement::nonblocking(cnt_v, sig(cnt_v).add(lit(1, 10))),
                    ),
                ]),
                Statement::nonblocking(cnt_h, sig(cnt_h).add(lit(1, 10))),
            ),
        ),
    );

    let pix_data = b.reg("pix_data", 16)?;
    let v_active = b.wire("vga_ctrl.v_active", 1)?;
    let pix_pre_req = b.wire("vga_ctrl.pix_pre_req", 1)?;
    let pix_x = b.wire("pix_x", 10)?;
    let pix_y = b.wire("pix_y", 10)?;

    b.assign(h_sync, sig(cnt_h).greater_eq(lit(h::SYNC, 10)));
    b.assign(v_sync, sig(cnt_v).greater_eq(lit(v::SYNC, 10)));
    b.assign(v_active, within(cnt_v, v::VISIBLE_START, v::VISIBLE_END));
    b.assign(
        rgb,
        within(cnt_h, h::VISIBLE_START, h::VISIBLE_END)
            .logic_and(sig(v_active))
            .select(sig(pix_data), lit(0, 16)),
    );
    // Pixel coordinates are requested one column early so the registered
    // colour lines up with the visible area.
    b.assign(
        pix_pre_req,
        within(cnt_h, h::VISIBLE_START - 1, h::VISIBLE_END - 1).logic_and(sig(v_active)),
    );
    b.comb(
        "pix_coords",
        Statement::if_else(
            sig(pix_pre_req),
            Statement::block([
                Statement::assign(pix_x, sig(cnt_h).sub(lit(h::VISIBLE_START - 1, 10))),
                Statement::assign(pix_y, sig(cnt_v).sub(lit(v::VISIBLE_START, 10))),
            ]),
            Statement::block([
                Statement::assign(pix_x, lit(0, 10)),
                Statement::assign(pix_y, lit(0, 10)),
            ]),
        ),
    );

    // Character lookup.
    let font = b.rom(FONT_ROM, crate::rom::GLYPH_COUNT * crate::rom::GLYPH_BYTES)?;
    let in_char_area = b.wire("vga_pic.in_char_area", 1)?;
    let rel_x = b.wire("vga_pic.rel_x", 7)?;
    let rel_y = b.wire("vga_pic.rel_y", 5)?;
    let char_index = b.wire("vga_pic.char_index", 2)?;
    let pix_x_in = b.wire("vga_pic.pix_x_in", 5)?;
    let byte_idx = b.wire("vga_pic.byte_idx", 2)?;
    let addr = b.wire("vga_pic.addr", 9)?;
    let char_byte = b.wire("vga_pic.char_byte", 8)?;
    let bit_sel = b.wire("vga_pic.bit_sel", 3)?;
    let bit_val = b.wire("vga_pic.bit_val", 1)?;

    let gate = |e: Expr, width| sig(in_char_area).select(e, lit(0, width));
    b.assign(
        in_char_area,
        within(pix_x, text::X, text::X + text::WIDTH)
            .logic_and(within(pix_y, text::Y, text::Y + text::HEIGHT)),
    );
    b.assign(rel_x, gate(sig(pix_x).slice(6, 0), 7));
    b.assign(rel_y, gate(sig(pix_y).slice(4, 0), 5));
    b.assign(char_index, sig(rel_x).slice(6, 5));
    b.assign(pix_x_in, sig(rel_x).slice(4, 0));
    b.assign(byte_idx, sig(pix_x_in).slice(4, 3));
    b.assign(
        addr,
        Expr::Concat(vec![sig(char_index), sig(rel_y), sig(byte_idx)]),
    );
    b.assign(char_byte, gate(Expr::rom(font, sig(addr)), 8));
    b.assign(bit_sel, gate(lit(7, 3).sub(sig(pix_x_in).slice(2, 0)), 3));
    b.assign(
        bit_val,
        gate(sig(char_byte).shr(sig(bit_sel)).slice(0, 0), 1),
    );

    // Picture generator.
    let char_color = b.reg("vga_pic.char_color", 16)?;
    b.set_init(char_color, colour::GOLDEN)?;
    let bars = colour::BARS
        .iter()
        .enumerate()
        .map(|(i, &c)| CaseArm {
            patterns: vec![lit(i as u64, 10)],
            body: Statement::nonblocking(pix_data, lit(c, 16)),
        })
        .collect();
    b.clocked(
        "vga_pic",
        reset_edges(vga_clk),
        Statement::if_else(
            in_reset,
            Statement::block([
                Statement::nonblocking(pix_data, lit(0, 16)),
                Statement::nonblocking(char_color, lit(colour::GOLDEN, 16)),
            ]),
            Statement::if_else(
                sig(in_char_area).logic_and(sig(bit_val)),
                Statement::nonblocking(pix_data, sig(char_color)),
                Statement::Case {
                    subject: Expr::binary(BinaryOp::Div, sig(pix_x), lit(BAR_WIDTH, 10)),
                    arms: bars,
                    default: Some(Box::new(Statement::nonblocking(pix_data, lit(0, 16)))),
                },
            ),
        ),
    );

    let signals = BoardSignals {
        clk,
        reset,
        buttons,
        h_sync,
        v_sync,
        rgb,
        leds,
        vga_clk,
        cnt_h,
        cnt_v,
        pix_data,
    };
    Ok((b.build()?, signals))
}

#[cfg(test)]
mod tests {
    use super::*;
    use vela_sim::Schedule;

    #[test]
    fn builds_and_classifies() {
        let (design, signals) = build().unwrap();
        let schedule = Schedule::compile(&design);
        assert_eq!(schedule.input_comb.len(), 5);
        assert_eq!(schedule.domains.len(), 2);
        assert_eq!(schedule.domains[0].description, "@(posedge clk or negedge reset)");
        assert_eq!(
            schedule.domains[1].description,
            "@(posedge pll.vga_clk or negedge reset)"
        );
        assert_eq!(schedule.domains[1].processes.len(), 2);
        assert!(schedule.feedback.is_empty());
        assert!(schedule.settle_watch.contains(&signals.cnt_h));
        assert!(schedule.settle_watch.contains(&signals.pix_data));
        assert_eq!(design.find_rom(FONT_ROM).map(|r| design.roms[r].depth), Some(512));
    }
}
