//! Test doubles for the minifier gateway.

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use crate::bundle::Minifier;
use crate::error::{DeployError, DeployResult};

/// One recorded minifier invocation.
#[derive(Debug, Clone)]
pub struct MinifierCall {
  pub input: PathBuf,
  pub output: PathBuf,
  pub content: String,
}

/// Captures every input and writes it unchanged to the output.
#[derive(Debug, Default)]
pub struct RecordingMinifier {
  calls: RefCell<Vec<MinifierCall>>,
  fail: bool,
}

impl RecordingMinifier {
  pub fn failing() -> Self {
    Self {
      calls: RefCell::default(),
      fail: true,
    }
  }

  pub fn calls(&self) -> Vec<MinifierCall> {
    self.calls.borrow().clone()
  }
}

impl Minifier for RecordingMinifier {
  fn run(&self, input: &Path, output: &Path) -> DeployResult<()> {
    let content = fs::read_to_string(input).map_err(|err| DeployError::io(input, err))?;
    self.calls.borrow_mut().push(MinifierCall {
      input: input.to_path_buf(),
      output: output.to_path_buf(),
      content: content.clone(),
    });
    if self.fail {
      return Err(DeployError::MinificationFailure {
        input: input.to_path_buf(),
        reason: "exit status: 1".into(),
      });
    }
    fs::write(output, content).map_err(|err| DeployError::io(output, err))
  }
}
