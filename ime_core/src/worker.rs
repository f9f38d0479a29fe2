//! 后台候选生成：快速打字时只交付最新一次输入的结果。
//!
//! 每次 `submit` 递增代数（generation）；worker 先把排队的请求排空到最新一条，
//! 生成前后都检查代数，过期结果直接丢弃。

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, mpsc};
use std::time::{Duration, Instant};
use std::{io, thread};

use tracing::debug;

use crate::dictionary::Dictionary;
use crate::engine::Engine;
use crate::error::InputError;
use crate::model::Candidate;
use crate::segmenter::Segmenter;

struct ResolveWork {
    input: String,
    generation: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveResult {
    pub generation: u64,
    pub input: String,
    pub candidates: Result<Vec<Candidate>, InputError>,
}

pub struct ResolveWorker {
    work_tx: mpsc::Sender<ResolveWork>,
    result_rx: Mutex<mpsc::Receiver<ResolveResult>>,
    generation: Arc<AtomicU64>,
}

impl ResolveWorker {
    pub fn spawn<D, S>(engine: Arc<Engine<D, S>>) -> io::Result<Self>
    where
        D: Dictionary + 'static,
        S: Segmenter + 'static,
    {
        let generation = Arc::new(AtomicU64::new(0));
        let (work_tx, work_rx) = mpsc::channel::<ResolveWork>();
        let (result_tx, result_rx) = mpsc::channel::<ResolveResult>();
        {
            let generation = Arc::clone(&generation);
            thread::Builder::new()
                .name("ime-resolve".into())
                .spawn(move || resolve_loop(work_rx, result_tx, generation, engine))?;
        }
        Ok(Self {
            work_tx,
            result_rx: Mutex::new(result_rx),
            generation,
        })
    }

    /// 提交新输入，返回其代数；之前未交付的请求全部作废。
    pub fn submit(&self, input: impl Into<String>) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let _ = self.work_tx.send(ResolveWork {
            input: input.into(),
            generation,
        });
        generation
    }

    /// 作废所有在途请求（例如上屏后清空输入）。
    pub fn invalidate(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    pub fn latest_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// 非阻塞取结果；只返回最新代数的结果。
    pub fn try_recv(&self) -> Option<ResolveResult> {
        let rx = self.result_rx.lock().ok()?;
        while let Ok(result) = rx.try_recv() {
            if self.is_current(&result) {
                return Some(result);
            }
        }
        None
    }

    /// 阻塞等待最新代数的结果，最多等 `timeout`。
    pub fn recv_timeout(&self, timeout: Duration) -> Option<ResolveResult> {
        let deadline = Instant::now() + timeout;
        let rx = self.result_rx.lock().ok()?;
        loop {
            let remaining = deadline.checked_duration_since(Instant::now())?;
            match rx.recv_timeout(remaining) {
                Ok(result) if self.is_current(&result) => return Some(result),
                Ok(_) => continue,
                Err(_) => return None,
            }
        }
    }

    fn is_current(&self, result: &ResolveResult) -> bool {
        result.generation == self.generation.load(Ordering::SeqCst)
    }
}

fn resolve_loop<D, S>(
    rx: mpsc::Receiver<ResolveWork>,
    tx: mpsc::Sender<ResolveResult>,
    generation: Arc<AtomicU64>,
    engine: Arc<Engine<D, S>>,
) where
    D: Dictionary,
    S: Segmenter,
{
    while let Ok(work) = rx.recv() {
        // 排空队列，只处理最新一条
        let mut latest = work;
        while let Ok(newer) = rx.try_recv() {
            latest = newer;
        }

        if latest.generation != generation.load(Ordering::SeqCst) {
            debug!(generation = latest.generation, "跳过过期请求");
            continue;
        }

        let candidates = engine.resolve(&latest.input);

        // 生成期间又有新输入：结果作废
        if latest.generation != generation.load(Ordering::SeqCst) {
            debug!(generation = latest.generation, "丢弃过期结果");
            continue;
        }
        let result = ResolveResult {
            generation: latest.generation,
            input: latest.input,
            candidates,
        };
        if tx.send(result).is_err() {
            break;
        }
    }
}
