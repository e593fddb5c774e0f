//! Where dry-run output goes

use std::io::{Stdout, Write};
use std::sync::{Arc, Mutex, PoisonError};

use crate::error::Result;
use crate::resource::Resource;

/// Receives the objects a dry run would have written
pub trait DryRunSink: Send + Sync {
    fn emit(&self, resource: &Resource) -> Result<()>;
}

/// Writes each object as indented JSON
pub struct JsonSink<W> {
    out: Mutex<W>,
}

impl<W: Write + Send> JsonSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

impl JsonSink<Stdout> {
    /// Sink printing to standard output
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> DryRunSink for JsonSink<W> {
    fn emit(&self, resource: &Resource) -> Result<()> {
        let json = serde_json::to_string_pretty(resource.object())?;
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        writeln!(out, "{}", json)?;
        out.flush()?;
        Ok(())
    }
}

/// Keeps emitted objects for assertions
#[derive(Clone, Default)]
pub struct RecordingSink {
    emitted: Arc<Mutex<Vec<Resource>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Objects emitted so far, in order
    pub fn emitted(&self) -> Vec<Resource> {
        self.emitted
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.emitted.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DryRunSink for RecordingSink {
    fn emit(&self, resource: &Resource) -> Result<()> {
        self.emitted
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(resource.clone());
        Ok(())
    }
}
