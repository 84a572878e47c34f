/// Receiver for bytes shifted out of the serial port.
///
/// Test ROMs report results this way. Bytes arrive one at a time, in
/// program order, before the instruction that started the transfer
/// returns.
pub trait SerialSink {
    fn write_byte(&mut self, byte: u8);
}

impl<T: SerialSink + ?Sized> SerialSink for Box<T> {
    fn write_byte(&mut self, byte: u8) {
        (**self).write_byte(byte);
    }
}

/// Discards all output.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSerial;

impl SerialSink for NullSerial {
    fn write_byte(&mut self, _byte: u8) {}
}

/// Collects all output in memory.
#[derive(Clone, Debug, Default)]
pub struct CapturedSerial {
    data: Vec<u8>,
}

impl CapturedSerial {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.data).into_owned()
    }

    pub fn clear(&mut self) {
        self.data.clear();
    }
}

impl SerialSink for CapturedSerial {
    fn write_byte(&mut self, byte: u8) {
        self.data.push(byte);
    }
}

/// Logs each completed line at info level.
#[derive(Clone, Debug, Default)]
pub struct LogSerial {
    line: Vec<u8>,
}

impl SerialSink for LogSerial {
    fn write_byte(&mut self, byte: u8) {
        if byte == b'\n' {
            log::info!("serial: {}", String::from_utf8_lossy(&self.line));
            self.line.clear();
        } else {
            self.line.push(byte);
        }
    }
}

/// SB/SC registers.
///
/// Only the internal-clock side of a transfer matters here: writing SC
/// with bit 7 set hands SB to the sink at once and clears bit 7 again.
pub(crate) struct Serial<S> {
    pub(crate) sb: u8,
    pub(crate) sc: u8,
    sink: S,
}

impl<S: SerialSink> Serial<S> {
    pub(crate) fn new(sink: S) -> Self {
        Self {
            sb: 0,
            sc: 0,
            sink,
        }
    }

    pub(super) fn write_sb(&mut self, value: u8) {
        self.sb = value;
    }

    pub(super) fn write_sc(&mut self, value: u8) {
        if value & 0x80 != 0 {
            self.sink.write_byte(self.sb);
            self.sc = value & !0x80;
        } else {
            self.sc = value;
        }
    }

    pub(crate) fn sink(&self) -> &S {
        &self.sink
    }

    pub(crate) fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }
}
