//! # Pool de Workers
//! src/server/pool.rs
//!
//! Número fijo de threads que consumen una cola FIFO acotada. Cada trabajo
//! (una conexión) lo procesa un único worker de principio a fin.
//!
//! Cuando la cola está llena `submit` rechaza el trabajo y lo devuelve al
//! llamador, que decide qué hacer con él (el servidor responde 503).

use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use thiserror::Error;
use tracing::{debug, error};

#[derive(Debug, Error)]
pub enum PoolError {
    #[error("Worker queue is full (max capacity: {capacity})")]
    QueueFull { capacity: usize },

    #[error("Worker pool is shutting down")]
    ShuttingDown,

    #[error("Worker pool needs at least one worker")]
    NoWorkers,

    #[error("Worker queue capacity must be >= 1")]
    ZeroCapacity,

    #[error("Failed to spawn worker thread: {0}")]
    Spawn(#[source] std::io::Error),
}

/// Trabajo rechazado junto con el motivo
#[derive(Debug)]
pub struct Rejected<T> {
    pub job: T,
    pub reason: PoolError,
}

/// Estado protegido por el mutex
struct QueueState<T> {
    jobs: VecDeque<T>,
    shutdown: bool,
}

struct Shared<T> {
    state: Mutex<QueueState<T>>,

    /// Notifica a los workers cuando hay trabajo nuevo o apagado
    available: Condvar,

    capacity: usize,
}

impl<T> Shared<T> {
    fn lock(&self) -> MutexGuard<'_, QueueState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Pool de workers con cola acotada
pub struct WorkerPool<T: Send + 'static> {
    shared: Arc<Shared<T>>,
    workers: Vec<JoinHandle<()>>,
}

impl<T: Send + 'static> WorkerPool<T> {
    /// Crea el pool e inicia `workers` threads que ejecutan `handler`
    /// para cada trabajo recibido
    pub fn new<H>(workers: usize, capacity: usize, handler: H) -> Result<Self, PoolError>
    where
        H: Fn(T) + Send + Sync + 'static,
    {
        if workers == 0 {
            return Err(PoolError::NoWorkers);
        }
        if capacity == 0 {
            return Err(PoolError::ZeroCapacity);
        }

        let shared = Arc::new(Shared {
            state: Mutex::new(QueueState {
                jobs: VecDeque::with_capacity(capacity),
                shutdown: false,
            }),
            available: Condvar::new(),
            capacity,
        });
        let handler = Arc::new(handler);

        // Si falla un spawn, el Drop del pool detiene a los ya iniciados
        let mut pool = Self {
            shared,
            workers: Vec::with_capacity(workers),
        };

        for i in 0..workers {
            let shared = Arc::clone(&pool.shared);
            let handler = Arc::clone(&handler);
            let name = format!("worker-{}", i);

            let handle = thread::Builder::new()
                .name(name.clone())
                .spawn(move || Self::worker_loop(name, shared, handler))
                .map_err(PoolError::Spawn)?;
            pool.workers.push(handle);
        }

        Ok(pool)
    }

    /// Encola un trabajo
    ///
    /// Retorna el trabajo dentro de `Rejected` si la cola está llena o el
    /// pool se está apagando.
    pub fn submit(&self, job: T) -> Result<(), Rejected<T>> {
        let mut state = self.shared.lock();

        if state.shutdown {
            return Err(Rejected {
                job,
                reason: PoolError::ShuttingDown,
            });
        }
        if state.jobs.len() >= self.shared.capacity {
            return Err(Rejected {
                job,
                reason: PoolError::QueueFull {
                    capacity: self.shared.capacity,
                },
            });
        }

        state.jobs.push_back(job);
        self.shared.available.notify_one();
        Ok(())
    }

    /// Trabajos en cola que ningún worker ha tomado todavía
    pub fn queued(&self) -> usize {
        self.shared.lock().jobs.len()
    }

    /// Capacidad máxima de la cola
    pub fn capacity(&self) -> usize {
        self.shared.capacity
    }

    pub fn workers(&self) -> usize {
        self.workers.len()
    }

    /// Loop principal del worker
    fn worker_loop<H>(name: String, shared: Arc<Shared<T>>, handler: Arc<H>)
    where
        H: Fn(T) + Send + Sync + 'static,
    {
        debug!(worker = %name, "worker started");

        loop {
            // Esperar por un trabajo (o por el apagado con la cola vacía)
            let job = {
                let mut state = shared.lock();
                loop {
                    if let Some(job) = state.jobs.pop_front() {
                        break Some(job);
                    }
                    if state.shutdown {
                        break None;
                    }
                    state = shared
                        .available
                        .wait(state)
                        .unwrap_or_else(PoisonError::into_inner);
                }
            };

            let Some(job) = job else { break };

            // Un panic en un trabajo no debe matar al worker
            if panic::catch_unwind(AssertUnwindSafe(|| (*handler)(job))).is_err() {
                error!(worker = %name, "job panicked; worker continues");
            }
        }

        debug!(worker = %name, "worker stopped");
    }
}

impl<T: Send + 'static> Drop for WorkerPool<T> {
    /// Deja de aceptar trabajos, vacía la cola y espera a los workers
    fn drop(&mut self) {
        self.shared.lock().shutdown = true;
        self.shared.available.notify_all();

        for handle in self.workers.drain(..) {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::mpsc;
    use std::time::Duration;

    #[test]
    fn test_rejects_invalid_sizes() {
        assert!(matches!(WorkerPool::<u32>::new(0, 1, |_| {}), Err(PoolError::NoWorkers)));
        assert!(matches!(WorkerPool::<u32>::new(1, 0, |_| {}), Err(PoolError::ZeroCapacity)));
    }

    #[test]
    fn test_runs_all_jobs() {
        let counter = Arc::new(AtomicUsize::new(0));
        let pool = {
            let counter = Arc::clone(&counter);
            WorkerPool::new(3, 100, move |n: usize| {
                counter.fetch_add(n, Ordering::SeqCst);
            })
            .unwrap()
        };
        assert_eq!(pool.workers(), 3);

        for _ in 0..50 {
            pool.submit(2).unwrap();
        }

        // Drop espera a que se vacíe la cola
        drop(pool);
        assert_eq!(counter.load(Ordering::SeqCst), 100);
    }

    #[test]
    fn test_queue_full_returns_job() {
        let (started_tx, started_rx) = mpsc::channel::<()>();
        let (release_tx, release_rx) = mpsc::channel::<()>();
        let started_tx = Mutex::new(started_tx);
        let release_rx = Mutex::new(release_rx);

        let pool = WorkerPool::new(1, 1, move |_job: &'static str| {
            started_tx.lock().unwrap().send(()).unwrap();
            release_rx.lock().unwrap().recv().unwrap();
        })
        .unwrap();
        assert_eq!(pool.capacity(), 1);

        // El único worker queda ocupado con el primer trabajo
        pool.submit("busy").unwrap();
        started_rx.recv_timeout(Duration::from_secs(5)).unwrap();

        // Uno cabe en la cola, el siguiente se rechaza
        pool.submit("queued").unwrap();
        assert_eq!(pool.queued(), 1);

        let rejected = pool.submit("overflow").unwrap_err();
        assert_eq!(rejected.job, "overflow");
        assert!(matches!(rejected.reason, PoolError::QueueFull { capacity: 1 }));

        release_tx.send(()).unwrap();
        release_tx.send(()).unwrap();
        started_rx.recv_timeout(Duration::from_secs(5)).unwrap();
    }

    #[test]
    fn test_worker_survives_panic() {
        let (tx, rx) = mpsc::channel();
        let tx = Mutex::new(tx);

        let pool = WorkerPool::new(1, 10, move |n: u32| {
            if n == 0 {
                panic!("boom");
            }
            tx.lock().unwrap().send(n).unwrap();
        })
        .unwrap();

        pool.submit(0).unwrap();
        pool.submit(7).unwrap();

        assert_eq!(rx.recv_timeout(Duration::from_secs(5)).unwrap(), 7);
    }
}
