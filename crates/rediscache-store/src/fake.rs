//! In-process stand-in for a Redis connection
//!
//! Understands the handful of commands the adapter issues and records every
//! command it receives, so tests can assert on the exact keys sent. Enabled
//! outside this crate's own tests by the `test-util` feature.

use redis::aio::ConnectionLike;
use redis::{Arg, Cmd, ErrorKind, Pipeline, RedisError, RedisFuture, RedisResult, Value};
use std::collections::HashMap;
use std::io;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    /// Socket-level failure
    Connection,
    /// Server answers `WRONGTYPE`, as for a key holding a list
    WrongType,
}

#[derive(Default)]
struct State {
    items: HashMap<Vec<u8>, Vec<u8>>,
    commands: Vec<String>,
    failure: Option<Failure>,
}

#[derive(Clone, Default)]
pub struct FakeConnection {
    state: Arc<Mutex<State>>,
}

impl FakeConnection {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Make every following command fail
    pub fn fail_with(&self, failure: Failure) {
        self.state().failure = Some(failure);
    }

    pub fn raw_get(&self, key: &str) -> Option<Vec<u8>> {
        self.state().items.get(key.as_bytes()).cloned()
    }

    pub fn raw_set(&self, key: &str, value: &[u8]) {
        self.state()
            .items
            .insert(key.as_bytes().to_vec(), value.to_vec());
    }

    pub fn is_empty(&self) -> bool {
        self.state().items.is_empty()
    }

    /// Keys currently held, as strings
    pub fn keys(&self) -> Vec<String> {
        self.state()
            .items
            .keys()
            .map(|key| String::from_utf8_lossy(key).into_owned())
            .collect()
    }

    /// Verb and key of every command received, in order
    pub fn commands(&self) -> Vec<String> {
        self.state().commands.clone()
    }

    fn execute(&self, cmd: &Cmd) -> RedisResult<Value> {
        let args: Vec<Vec<u8>> = cmd
            .args_iter()
            .filter_map(|arg| match arg {
                Arg::Simple(bytes) => Some(bytes.to_vec()),
                Arg::Cursor => None,
            })
            .collect();

        let mut state = self.state();

        let verb = args
            .first()
            .map(|v| String::from_utf8_lossy(v).to_ascii_uppercase())
            .unwrap_or_default();
        let key = args.get(1).cloned().unwrap_or_default();
        state.commands.push(if key.is_empty() {
            verb.clone()
        } else {
            format!("{} {}", verb, String::from_utf8_lossy(&key))
        });

        match state.failure {
            Some(Failure::Connection) => {
                return Err(RedisError::from(io::Error::new(
                    io::ErrorKind::ConnectionReset,
                    "connection reset by peer",
                )))
            }
            Some(Failure::WrongType) => {
                return Err(RedisError::from((
                    ErrorKind::ExtensionError,
                    "WRONGTYPE",
                    "Operation against a key holding the wrong kind of value".to_string(),
                )))
            }
            None => {}
        }

        match verb.as_str() {
            "PING" => Ok(Value::SimpleString("PONG".to_string())),
            "GET" => Ok(state
                .items
                .get(&key)
                .map(|value| Value::BulkString(value.clone()))
                .unwrap_or(Value::Nil)),
            "SET" => {
                let value = args.get(2).cloned().unwrap_or_default();
                state.items.insert(key, value);
                Ok(Value::Okay)
            }
            "DEL" => {
                let removed = state.items.remove(&key).is_some();
                Ok(Value::Int(i64::from(removed)))
            }
            other => Err(RedisError::from((
                ErrorKind::ResponseError,
                "unsupported command",
                other.to_string(),
            ))),
        }
    }
}

impl ConnectionLike for FakeConnection {
    fn req_packed_command<'a>(&'a mut self, cmd: &'a Cmd) -> RedisFuture<'a, Value> {
        let result = self.execute(cmd);
        Box::pin(async move { result })
    }

    fn req_packed_commands<'a>(
        &'a mut self,
        _cmd: &'a Pipeline,
        _offset: usize,
        _count: usize,
    ) -> RedisFuture<'a, Vec<Value>> {
        Box::pin(async move {
            Err(RedisError::from((
                ErrorKind::ClientError,
                "pipelines are not supported",
            )))
        })
    }

    fn get_db(&self) -> i64 {
        0
    }
}
