//! Input sink that reports what the driver posts instead of delivering it.
//!
//! The host binary has no X server behind it; this sink stands in for the
//! server's device record.  Each registered class and posted event becomes
//! either a `tracing` record (`OutputFormat::Text`) or one JSON object per
//! line on the configured writer (`OutputFormat::Json`), e.g.
//!
//! ```text
//! {"device":"touchpad","event":"motion","mode":"Relative","first_valuator":0,"values":[3,-1]}
//! {"device":"touchpad","event":"touch","id":4,"kind":"Begin","x":1201.5,"y":880.25}
//! ```

use std::io::Write;
use std::sync::Mutex;

use serde::Serialize;
use tracing::{info, warn};
use xlibinput_core::{
    AxisMode, KeyboardClass, PointerClass, TouchClass, TouchEventType, TouchId, ValuatorMask,
};

use super::{InputSink, SinkError};
use crate::infrastructure::storage::config::OutputFormat;

/// One line of JSON output.
#[derive(Debug, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum Record<'a> {
    KeyboardClass,
    PointerClass {
        buttons: usize,
        axes: usize,
        absolute: bool,
    },
    TouchClass {
        max_touches: usize,
        num_axes: usize,
    },
    Motion {
        mode: AxisMode,
        first_valuator: u8,
        values: &'a [i32],
    },
    Button {
        mode: AxisMode,
        button: u8,
        pressed: bool,
    },
    Key {
        keycode: u32,
        pressed: bool,
    },
    Touch {
        id: u32,
        kind: TouchEventType,
        x: Option<f64>,
        y: Option<f64>,
    },
}

#[derive(Serialize)]
struct Line<'a> {
    device: &'a str,
    #[serde(flatten)]
    record: Record<'a>,
}

/// Logs every call on behalf of one device.
pub struct EventLogSink {
    device: String,
    format: OutputFormat,
    out: Mutex<Box<dyn Write + Send>>,
}

impl EventLogSink {
    /// Creates a sink for `device` writing JSON lines (if selected) to stdout.
    pub fn new(device: impl Into<String>, format: OutputFormat) -> Self {
        Self::with_writer(device, format, Box::new(std::io::stdout()))
    }

    /// Creates a sink with an explicit JSON writer.
    pub fn with_writer(
        device: impl Into<String>,
        format: OutputFormat,
        out: Box<dyn Write + Send>,
    ) -> Self {
        Self {
            device: device.into(),
            format,
            out: Mutex::new(out),
        }
    }

    fn emit(&self, record: Record<'_>) {
        match self.format {
            OutputFormat::Text => info!(device = %self.device, ?record, "posted"),
            OutputFormat::Json => self.write_json(record),
        }
    }

    fn write_json(&self, record: Record<'_>) {
        let line = Line {
            device: &self.device,
            record,
        };
        let Ok(mut out) = self.out.lock() else {
            warn!(device = %self.device, "event writer poisoned");
            return;
        };
        let result = serde_json::to_writer(&mut *out, &line)
            .map_err(std::io::Error::from)
            .and_then(|()| out.write_all(b"\n"))
            .and_then(|()| out.flush());
        if let Err(e) = result {
            warn!(device = %self.device, "failed to write event: {e}");
        }
    }
}

impl InputSink for EventLogSink {
    fn init_keyboard_class(&self, _class: &KeyboardClass) -> Result<(), SinkError> {
        self.emit(Record::KeyboardClass);
        Ok(())
    }

    fn init_pointer_class(&self, class: &PointerClass) -> Result<(), SinkError> {
        self.emit(Record::PointerClass {
            buttons: class.num_buttons(),
            axes: class.num_axes(),
            absolute: class.axes.iter().any(|a| a.mode == AxisMode::Absolute),
        });
        Ok(())
    }

    fn init_touch_class(&self, class: &TouchClass) -> Result<(), SinkError> {
        self.emit(Record::TouchClass {
            max_touches: class.max_touches,
            num_axes: class.num_axes,
        });
        Ok(())
    }

    fn post_motion(&self, mode: AxisMode, first_valuator: u8, values: &[i32]) {
        self.emit(Record::Motion {
            mode,
            first_valuator,
            values,
        });
    }

    fn post_button(&self, mode: AxisMode, button: u8, pressed: bool) {
        self.emit(Record::Button {
            mode,
            button,
            pressed,
        });
    }

    fn post_key(&self, keycode: u32, pressed: bool) {
        self.emit(Record::Key { keycode, pressed });
    }

    fn post_touch(&self, touch_id: TouchId, kind: TouchEventType, valuators: &ValuatorMask) {
        self.emit(Record::Touch {
            id: touch_id.0,
            kind,
            x: valuators.get(0),
            y: valuators.get(1),
        });
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use xlibinput_core::ScrollDistance;

    /// A `Write` handle whose bytes stay readable by the test.
    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuffer {
        fn lines(&self) -> Vec<serde_json::Value> {
            let bytes = self.0.lock().unwrap().clone();
            String::from_utf8(bytes)
                .unwrap()
                .lines()
                .map(|l| serde_json::from_str(l).unwrap())
                .collect()
        }
    }

    fn json_sink() -> (EventLogSink, SharedBuffer) {
        let buffer = SharedBuffer::default();
        let sink = EventLogSink::with_writer("pad", OutputFormat::Json, Box::new(buffer.clone()));
        (sink, buffer)
    }

    #[test]
    fn test_json_motion_line_carries_device_and_values() {
        // Arrange
        let (sink, buffer) = json_sink();

        // Act
        sink.post_motion(AxisMode::Relative, 0, &[3, -1]);

        // Assert
        let lines = buffer.lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0]["device"], "pad");
        assert_eq!(lines[0]["event"], "motion");
        assert_eq!(lines[0]["first_valuator"], 0);
        assert_eq!(lines[0]["values"], serde_json::json!([3, -1]));
    }

    #[test]
    fn test_json_touch_line_carries_id_and_position() {
        let (sink, buffer) = json_sink();
        let mut mask = ValuatorMask::new(2);
        mask.set_double(0, 12.5);
        mask.set_double(1, 40.0);

        sink.post_touch(TouchId(4), TouchEventType::Begin, &mask);

        let line = &buffer.lines()[0];
        assert_eq!(line["event"], "touch");
        assert_eq!(line["id"], 4);
        assert_eq!(line["kind"], "Begin");
        assert_eq!(line["x"], 12.5);
        assert_eq!(line["y"], 40.0);
    }

    #[test]
    fn test_json_class_lines_summarise_registration() {
        let (sink, buffer) = json_sink();

        sink.init_keyboard_class(&KeyboardClass).unwrap();
        sink.init_pointer_class(&PointerClass::relative(ScrollDistance::default()))
            .unwrap();
        sink.init_touch_class(&TouchClass::default()).unwrap();

        let lines = buffer.lines();
        let events: Vec<_> = lines.iter().map(|l| l["event"].clone()).collect();
        assert_eq!(
            events,
            vec!["keyboard_class", "pointer_class", "touch_class"]
        );
        assert_eq!(lines[1]["buttons"], 7);
        assert_eq!(lines[1]["axes"], 4);
        assert_eq!(lines[1]["absolute"], false);
        assert_eq!(lines[2]["max_touches"], 15);
    }

    #[test]
    fn test_text_format_writes_no_json() {
        let buffer = SharedBuffer::default();
        let sink = EventLogSink::with_writer("kbd", OutputFormat::Text, Box::new(buffer.clone()));

        sink.post_key(38, true);
        sink.post_button(AxisMode::Relative, 1, false);

        assert!(buffer.lines().is_empty());
    }
}
