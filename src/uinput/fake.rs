//! In-memory [`UinputNode`] that journals every request for assertions.

use super::record::{
    DeviceConfigRecord, EventKind, EventRecord, CONFIG_RECORD_SIZE, EVENT_RECORD_SIZE,
};
use super::UinputNode;
use std::cell::RefCell;
use std::io;
use std::rc::Rc;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Op {
    EnableEventType(EventKind),
    EnableKey(u16),
    EnableAxis(u16),
    Write(Vec<u8>),
    Create,
    Destroy,
    Close,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Fault {
    Open,
    KeyCategory,
    KeyCode(u16),
    AxisCategory,
    AxisCode(u16),
    ConfigWrite,
    ShortConfigWrite,
    Activation,
    EventWrite,
    ShortEventWrite,
    Deactivation,
}

#[derive(Debug, Default)]
struct Journal {
    opens: usize,
    ops: Vec<Op>,
}

/// Shared view of everything the fake node was asked to do.
#[derive(Clone, Default)]
pub(crate) struct FakeUinput {
    journal: Rc<RefCell<Journal>>,
    fault: Option<Fault>,
}

impl FakeUinput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(fault: Fault) -> Self {
        Self {
            fault: Some(fault),
            ..Self::default()
        }
    }

    pub fn opener(&self) -> impl FnOnce() -> io::Result<FakeNode> {
        let journal = Rc::clone(&self.journal);
        let fault = self.fault;
        move || {
            if fault == Some(Fault::Open) {
                return Err(io::Error::from(io::ErrorKind::PermissionDenied));
            }
            journal.borrow_mut().opens += 1;
            Ok(FakeNode { journal, fault })
        }
    }

    pub fn opens(&self) -> usize {
        self.journal.borrow().opens
    }

    pub fn closes(&self) -> usize {
        self.ops().iter().filter(|op| **op == Op::Close).count()
    }

    pub fn ops(&self) -> Vec<Op> {
        self.journal.borrow().ops.clone()
    }

    pub fn config_records(&self) -> Vec<DeviceConfigRecord> {
        self.writes()
            .iter()
            .filter_map(|bytes| DeviceConfigRecord::parse(bytes))
            .collect()
    }

    pub fn config_bytes(&self) -> Option<Vec<u8>> {
        self.writes()
            .into_iter()
            .find(|bytes| bytes.len() == CONFIG_RECORD_SIZE)
    }

    pub fn events(&self) -> Vec<EventRecord> {
        self.writes()
            .iter()
            .filter_map(|bytes| EventRecord::parse(bytes))
            .collect()
    }

    fn writes(&self) -> Vec<Vec<u8>> {
        self.ops()
            .into_iter()
            .filter_map(|op| match op {
                Op::Write(bytes) => Some(bytes),
                _ => None,
            })
            .collect()
    }
}

#[derive(Debug)]
pub(crate) struct FakeNode {
    journal: Rc<RefCell<Journal>>,
    fault: Option<Fault>,
}

impl FakeNode {
    fn record(&self, op: Op) {
        self.journal.borrow_mut().ops.push(op);
    }

    fn check(&self, fault: Fault) -> io::Result<()> {
        if self.fault == Some(fault) {
            Err(io::Error::from_raw_os_error(libc::EINVAL))
        } else {
            Ok(())
        }
    }
}

impl UinputNode for FakeNode {
    fn enable_event_type(&self, kind: EventKind) -> io::Result<()> {
        self.record(Op::EnableEventType(kind));
        match kind {
            EventKind::Key => self.check(Fault::KeyCategory),
            EventKind::Absolute => self.check(Fault::AxisCategory),
            EventKind::Sync => Ok(()),
        }
    }

    fn enable_key(&self, code: u16) -> io::Result<()> {
        self.record(Op::EnableKey(code));
        self.check(Fault::KeyCode(code))
    }

    fn enable_axis(&self, code: u16) -> io::Result<()> {
        self.record(Op::EnableAxis(code));
        self.check(Fault::AxisCode(code))
    }

    fn write_record(&self, bytes: &[u8]) -> io::Result<usize> {
        self.record(Op::Write(bytes.to_vec()));
        let (fail, short) = match bytes.len() {
            CONFIG_RECORD_SIZE => (Fault::ConfigWrite, Fault::ShortConfigWrite),
            EVENT_RECORD_SIZE => (Fault::EventWrite, Fault::ShortEventWrite),
            _ => return Ok(bytes.len()),
        };
        self.check(fail)?;
        if self.fault == Some(short) {
            Ok(bytes.len() / 2)
        } else {
            Ok(bytes.len())
        }
    }

    fn create(&self) -> io::Result<()> {
        self.record(Op::Create);
        self.check(Fault::Activation)
    }

    fn destroy(&self) -> io::Result<()> {
        self.record(Op::Destroy);
        self.check(Fault::Deactivation)
    }
}

impl Drop for FakeNode {
    fn drop(&mut self) {
        self.record(Op::Close);
    }
}
