// crates/infra/src/sweeper.rs
use std::{
    sync::{
        Arc,
        mpsc::{self, RecvTimeoutError, Sender},
    },
    thread::{self, JoinHandle},
    time::Duration,
};

use repo_lines_shared_kernel::{InfrastructureError, Result};

use crate::cache::Expiring;

/// Background thread that purges expired entries on a fixed period.
///
/// Stops and joins when dropped.
pub struct CacheSweeper {
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl CacheSweeper {
    /// Sweep period for a given default TTL: one fifth of it, at least a second.
    pub fn period_for(ttl: Duration) -> Duration {
        (ttl / 5).max(Duration::from_secs(1))
    }

    pub fn spawn(targets: Vec<Arc<dyn Expiring>>, period: Duration) -> Result<Self> {
        let (stop, stopped) = mpsc::channel::<()>();
        let handle = thread::Builder::new()
            .name("repo-lines-sweeper".to_string())
            .spawn(move || {
                loop {
                    match stopped.recv_timeout(period) {
                        Err(RecvTimeoutError::Timeout) => {
                            let removed: usize = targets.iter().map(|target| target.purge_expired()).sum();
                            if removed > 0 {
                                log::debug!("cache sweep removed {removed} expired entries");
                            }
                        }
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
            })
            .map_err(|e| InfrastructureError::Io {
                message: "failed to start cache sweeper".to_string(),
                source: Some(Box::new(e)),
            })?;
        Ok(Self { stop: Some(stop), handle: Some(handle) })
    }
}

impl Drop for CacheSweeper {
    fn drop(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[derive(Default)]
    struct Counting {
        sweeps: AtomicUsize,
    }

    impl Expiring for Counting {
        fn purge_expired(&self) -> usize {
            self.sweeps.fetch_add(1, Ordering::SeqCst);
            0
        }

        fn is_healthy(&self) -> bool {
            true
        }
    }

    #[test]
    fn period_is_a_fifth_of_the_ttl() {
        assert_eq!(CacheSweeper::period_for(Duration::from_secs(3600)), Duration::from_secs(720));
        assert_eq!(CacheSweeper::period_for(Duration::from_secs(2)), Duration::from_secs(1));
    }

    #[test]
    fn sweeps_until_dropped() {
        let target = Arc::new(Counting::default());
        let sweeper = CacheSweeper::spawn(vec![target.clone() as Arc<dyn Expiring>], Duration::from_millis(5)).unwrap();
        while target.sweeps.load(Ordering::SeqCst) < 2 {
            thread::sleep(Duration::from_millis(5));
        }
        drop(sweeper);

        let after_drop = target.sweeps.load(Ordering::SeqCst);
        thread::sleep(Duration::from_millis(30));
        assert_eq!(target.sweeps.load(Ordering::SeqCst), after_drop);
    }
}
