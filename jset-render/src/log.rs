/// Collects the engine's byte-at-a-time debug stream and hands complete
/// lines to a sink.
pub struct LineBuffer {
    pending: Vec<u8>,
    sink: Box<dyn FnMut(&str)>,
}

impl LineBuffer {
    pub fn new(sink: impl FnMut(&str) + 'static) -> Self {
        Self {
            pending: Vec::new(),
            sink: Box::new(sink),
        }
    }

    /// Append one byte; a newline flushes the buffered line (without the
    /// terminator) to the sink.
    pub fn push(&mut self, byte: u8) {
        if byte == b'\n' {
            let line = String::from_utf8_lossy(&self.pending).into_owned();
            self.pending.clear();
            (self.sink)(&line);
        } else {
            self.pending.push(byte);
        }
    }

    /// Bytes received since the last newline.
    pub fn pending(&self) -> &[u8] {
        &self.pending
    }
}

impl std::fmt::Debug for LineBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineBuffer")
            .field("pending", &String::from_utf8_lossy(&self.pending))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn collecting() -> (LineBuffer, Rc<RefCell<Vec<String>>>) {
        let lines = Rc::new(RefCell::new(Vec::new()));
        let sink_lines = lines.clone();
        let buf = LineBuffer::new(move |line| sink_lines.borrow_mut().push(line.to_string()));
        (buf, lines)
    }

    #[test]
    fn flushes_on_newline_only() {
        let (mut buf, lines) = collecting();
        for b in b"hello" {
            buf.push(*b);
        }
        assert!(lines.borrow().is_empty());
        assert_eq!(buf.pending(), b"hello");
        buf.push(b'\n');
        assert_eq!(*lines.borrow(), vec!["hello".to_string()]);
        assert!(buf.pending().is_empty());
    }

    #[test]
    fn multiple_lines_and_empty_line() {
        let (mut buf, lines) = collecting();
        for b in b"a\n\nbc\n" {
            buf.push(*b);
        }
        assert_eq!(*lines.borrow(), vec!["a", "", "bc"]);
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let (mut buf, lines) = collecting();
        buf.push(0xff);
        buf.push(b'\n');
        assert_eq!(lines.borrow()[0], "\u{fffd}");
    }
}
