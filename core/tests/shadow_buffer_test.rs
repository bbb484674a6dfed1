mod common;

use common::CountingSurface;
use pixelbox_core::display::{DisplayError, Rgb, ShadowBuffer};

fn buffer(w: u32, h: u32) -> ShadowBuffer<CountingSurface> {
    ShadowBuffer::new(CountingSurface::new(w, h))
}

/// Tiny xorshift so the sequence test is deterministic without extra crates.
struct XorShift(u32);

impl XorShift {
    fn next(&mut self) -> u32 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.0 = x;
        x
    }
}

// ==========================================================================
// Diff exactness
// ==========================================================================

#[test]
fn test_first_present_writes_every_pixel_then_nothing() {
    let mut sb = buffer(4, 4);

    sb.clear(Rgb::BLACK);
    assert_eq!(sb.present().unwrap().written, 16);
    assert_eq!(sb.surface_mut().take_writes().len(), 16);

    // Same black again: nothing to forward
    for y in 0..4 {
        for x in 0..4 {
            sb.set_pixel(x, y, Rgb::BLACK);
        }
    }
    assert_eq!(sb.present().unwrap().written, 0);
    assert!(sb.surface_mut().take_writes().is_empty());
}

#[test]
fn test_idempotent_re_present() {
    let mut sb = buffer(8, 8);
    sb.set_pixel(3, 3, Rgb::RED);
    sb.present().unwrap();
    sb.surface_mut().take_writes();

    assert_eq!(sb.present().unwrap().written, 0);
    assert!(sb.surface_mut().take_writes().is_empty());
    // The device is still presented once per call.
    assert_eq!(sb.surface().presents, 2);
}

#[test]
fn test_only_changed_pixels_are_forwarded() {
    let mut sb = buffer(4, 4);
    sb.present().unwrap();
    sb.surface_mut().take_writes();

    sb.set_pixel(1, 2, Rgb::GREEN);
    sb.set_pixel(3, 0, Rgb::BLUE);
    sb.set_pixel(0, 0, Rgb::BLACK); // unchanged
    let stats = sb.present().unwrap();

    assert_eq!(stats.written, 2);
    let writes = sb.surface_mut().take_writes();
    // Row-major sweep order
    assert_eq!(writes, vec![(3, 0, Rgb::BLUE), (1, 2, Rgb::GREEN)]);
}

#[test]
fn test_change_reverted_before_present_costs_nothing() {
    let mut sb = buffer(4, 4);
    sb.present().unwrap();

    sb.set_pixel(2, 2, Rgb::WHITE);
    sb.set_pixel(2, 2, Rgb::BLACK);
    assert_eq!(sb.dirty_count(), 0);
    assert_eq!(sb.present().unwrap().written, 0);
}

#[test]
fn test_clear_goes_through_diff() {
    let mut sb = buffer(4, 4);
    sb.set_pixel(0, 0, Rgb::RED);
    sb.present().unwrap();
    sb.surface_mut().take_writes();

    // Only the one red pixel differs from a black clear.
    sb.clear(Rgb::BLACK);
    assert_eq!(sb.present().unwrap().written, 1);

    sb.clear(Rgb::WHITE);
    assert_eq!(sb.present().unwrap().written, 16);
}

#[test]
fn test_off_surface_writes_are_ignored() {
    let mut sb = buffer(4, 4);
    sb.present().unwrap();

    sb.set_pixel(-1, 0, Rgb::RED);
    sb.set_pixel(4, 4, Rgb::RED);
    sb.set_pixel(0, 100, Rgb::RED);
    assert_eq!(sb.present().unwrap().written, 0);
}

#[test]
fn test_random_sequences_forward_exact_diff() {
    let mut sb = buffer(8, 8);
    let palette = [Rgb::BLACK, Rgb::WHITE, Rgb::RED, Rgb::GREEN];
    let mut rng = XorShift(0x1234_5678);

    sb.present().unwrap();
    sb.surface_mut().take_writes();

    for _round in 0..50 {
        let before = sb.frame().clone();
        let ops = rng.next() % 40;
        for _ in 0..ops {
            let r = rng.next();
            if r % 25 == 0 {
                sb.clear(palette[(r >> 8) as usize % palette.len()]);
            } else {
                let x = (r >> 4) as i32 % 10 - 1; // includes off-surface -1 and 8
                let y = (r >> 12) as i32 % 10 - 1;
                sb.set_pixel(x, y, palette[(r >> 20) as usize % palette.len()]);
            }
        }

        let expected = before
            .pixels()
            .iter()
            .zip(sb.frame().pixels())
            .filter(|(a, b)| a != b)
            .count();
        let stats = sb.present().unwrap();
        let writes = sb.surface_mut().take_writes();

        assert_eq!(stats.written, expected);
        assert_eq!(writes.len(), expected);
        // Surface now mirrors the pending frame
        assert_eq!(sb.surface().pixels, sb.frame().pixels());
    }
}

// ==========================================================================
// Invalidate
// ==========================================================================

#[test]
fn test_invalidate_rewrites_everything() {
    let mut sb = buffer(4, 2);
    sb.present().unwrap();
    sb.surface_mut().take_writes();

    sb.invalidate();
    assert_eq!(sb.present().unwrap().written, 8);
    assert_eq!(sb.present().unwrap().written, 0);
}

// ==========================================================================
// Device failures
// ==========================================================================

#[test]
fn test_write_failure_keeps_shadow_consistent() {
    let mut sb = buffer(4, 4);
    // Third write attempt fails
    sb.surface_mut().fail_write_at = Some(3);

    let err = sb.present().unwrap_err();
    assert!(matches!(err, DisplayError::Write { x: 2, y: 0, .. }));
    // Two pixels made it, the surface was not presented
    assert_eq!(sb.surface().total_writes, 2);
    assert_eq!(sb.surface().presents, 0);

    // Next present forwards only what is still outstanding
    let stats = sb.present().unwrap();
    assert_eq!(stats.written, 14);
    assert_eq!(sb.surface().total_writes, 16);
    assert_eq!(sb.surface().presents, 1);
}

#[test]
fn test_present_failure_still_updates_shadow() {
    let mut sb = buffer(2, 2);
    sb.surface_mut().fail_present = true;
    assert!(matches!(sb.present(), Err(DisplayError::Present(_))));
    // Pixels were written before the flush failed; they are not resent.
    assert_eq!(sb.surface().total_writes, 4);

    sb.surface_mut().fail_present = false;
    assert_eq!(sb.present().unwrap().written, 0);
    assert_eq!(sb.surface().presents, 1);
}

#[test]
fn test_into_inner_returns_surface() {
    let mut sb = buffer(2, 2);
    sb.set_pixel(1, 1, Rgb::CYAN);
    sb.present().unwrap();
    let surface = sb.into_inner();
    assert_eq!(surface.pixel(1, 1), Rgb::CYAN);
}
