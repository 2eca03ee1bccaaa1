//! Scripted executor shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use ffthumb_media::{CommandExecutor, CommandPlan, MediaError, MediaResult, ProcessOutput};

/// One recorded `execute` call.
#[derive(Debug, Clone)]
pub struct Call {
    pub plan: CommandPlan,
    pub timeout: Option<Duration>,
}

/// Executor that records every plan and replays queued outcomes.
///
/// Calls beyond the queued outcomes succeed with empty output.
#[derive(Default)]
pub struct ScriptedExecutor {
    missing: Vec<String>,
    outcomes: Mutex<VecDeque<MediaResult<ProcessOutput>>>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `locate(program)` fail.
    pub fn without_tool(mut self, program: &str) -> Self {
        self.missing.push(program.to_string());
        self
    }

    pub fn then_ok(self) -> Self {
        self.then(Ok(ProcessOutput::default()))
    }

    pub fn then_stdout(self, stdout: &str) -> Self {
        self.then(Ok(ProcessOutput {
            stdout: stdout.as_bytes().to_vec(),
            stderr: Vec::new(),
        }))
    }

    pub fn then_exit(self, code: i32) -> Self {
        self.then(Err(MediaError::process_failed(
            "ffmpeg",
            Some(code),
            format!("exit {}", code),
        )))
    }

    pub fn then_timeout(self, after: Duration) -> Self {
        self.then(Err(MediaError::Timeout(after)))
    }

    pub fn then(self, outcome: MediaResult<ProcessOutput>) -> Self {
        self.outcomes.lock().unwrap().push_back(outcome);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandExecutor for ScriptedExecutor {
    fn locate(&self, program: &str) -> MediaResult<PathBuf> {
        if self.missing.iter().any(|m| m == program) {
            return Err(MediaError::tool_not_found(program));
        }
        Ok(PathBuf::from("/usr/bin").join(program))
    }

    async fn execute(
        &self,
        plan: &CommandPlan,
        timeout: Option<Duration>,
    ) -> MediaResult<ProcessOutput> {
        self.calls.lock().unwrap().push(Call {
            plan: plan.clone(),
            timeout,
        });
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(ProcessOutput::default()))
    }
}
