//! Fuzz target: `InputRouter::update`
//!
//! Each 4-byte chunk is one sample: button bits, joystick X, and the
//! time step. Asserts the router never reports a press edge for a button
//! that is not debounced-held, and never two edges without a release.
//!
//! cargo fuzz run fuzz_input_sequence

#![no_main]

use envmon::app::ports::RawInputs;
use envmon::drivers::button::InputRouter;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut router = InputRouter::new(50);
    let mut now: u32 = 0;
    let mut was_held = (false, false, false);

    for chunk in data.chunks_exact(4) {
        let raw = RawInputs {
            button_a: chunk[0] & 1 != 0,
            button_b: chunk[0] & 2 != 0,
            joystick_button: chunk[0] & 4 != 0,
            joystick_x: u16::from_le_bytes([chunk[1], chunk[2]]) & 0x0FFF,
        };
        now = now.wrapping_add(u32::from(chunk[3]));

        let frame = router.update(raw, now);
        let held = router.held();

        // An edge means released before, held now.
        assert_eq!(frame.a_pressed, held.0 && !was_held.0);
        assert_eq!(frame.b_pressed, held.1 && !was_held.1);
        assert_eq!(frame.joy_pressed, held.2 && !was_held.2);
        was_held = held;
    }
});
