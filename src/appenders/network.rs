//! Remote shipper for centralized logging
//!
//! Renders every emitted record with the [`StructuredFormatter`] and delivers
//! it to a collector over one persistent connection. The logging thread only
//! enqueues; a dedicated worker thread is the sole writer to the socket.

use crate::core::{
    Hook, LogLevel, LogRecord, LoggerError, LoggerMetrics, OverflowCallback, OverflowPolicy,
    Result, DEFAULT_SHUTDOWN_TIMEOUT,
};
use crate::formatters::StructuredFormatter;
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use parking_lot::{Mutex, RwLock};
use std::io::{self, Write};
use std::net::{TcpStream, ToSocketAddrs, UdpSocket};
use std::str::FromStr;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Delivery queue capacity used when the configuration leaves it at zero.
pub const DEFAULT_CHANNEL_SIZE: usize = 1024;

/// Socket write timeout applied to stream connections unless overridden.
pub const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_secs(5);

/// Parsed collector address, `<scheme>://<address>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dsn {
    Tcp(String),
    Udp(String),
    #[cfg(unix)]
    Unix(std::path::PathBuf),
}

impl FromStr for Dsn {
    type Err = LoggerError;

    fn from_str(dsn: &str) -> Result<Self> {
        let (scheme, address) = dsn
            .split_once("://")
            .ok_or_else(|| LoggerError::invalid_dsn(dsn, "missing scheme"))?;
        if address.is_empty() {
            return Err(LoggerError::invalid_dsn(dsn, "missing address"));
        }

        match scheme.to_ascii_lowercase().as_str() {
            "tcp" | "tcp4" | "tcp6" => Ok(Dsn::Tcp(address.to_string())),
            "udp" | "udp4" | "udp6" => Ok(Dsn::Udp(address.to_string())),
            #[cfg(unix)]
            "unix" => Ok(Dsn::Unix(address.into())),
            other => Err(LoggerError::invalid_dsn(
                dsn,
                format!("unsupported scheme '{}'", other),
            )),
        }
    }
}

impl Dsn {
    /// Dial the collector once. `write_timeout` applies to stream sockets;
    /// `None` lets a write block until the peer drains.
    pub fn connect(&self, write_timeout: Option<Duration>) -> Result<Box<dyn Write + Send>> {
        match self {
            Dsn::Tcp(address) => {
                let stream =
                    TcpStream::connect(address).map_err(|e| LoggerError::connect(address, e))?;
                stream.set_write_timeout(write_timeout)?;
                stream.set_nodelay(true)?;
                Ok(Box::new(stream))
            }
            Dsn::Udp(address) => {
                let target = address
                    .to_socket_addrs()
                    .map_err(|e| LoggerError::connect(address, e))?
                    .next()
                    .ok_or_else(|| {
                        LoggerError::connect(
                            address,
                            io::Error::new(io::ErrorKind::NotFound, "address did not resolve"),
                        )
                    })?;
                let local = if target.is_ipv4() { "0.0.0.0:0" } else { "[::]:0" };
                let socket = UdpSocket::bind(local).map_err(|e| LoggerError::connect(address, e))?;
                socket
                    .connect(target)
                    .map_err(|e| LoggerError::connect(address, e))?;
                Ok(Box::new(DatagramWriter(socket)))
            }
            #[cfg(unix)]
            Dsn::Unix(path) => {
                let stream = std::os::unix::net::UnixStream::connect(path)
                    .map_err(|e| LoggerError::connect(path.display().to_string(), e))?;
                stream.set_write_timeout(write_timeout)?;
                Ok(Box::new(stream))
            }
        }
    }
}

/// One document per datagram.
struct DatagramWriter(UdpSocket);

impl Write for DatagramWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.send(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Builder for [`RemoteShipper`]
///
/// # Example
///
/// ```no_run
/// use fieldlog::appenders::RemoteShipper;
/// use fieldlog::formatters::StructuredFormatter;
/// use fieldlog::{Fields, OverflowPolicy};
///
/// let shipper = RemoteShipper::builder(StructuredFormatter::new(Fields::new()))
///     .channel_size(4096)
///     .overflow_policy(OverflowPolicy::DropNewest)
///     .connect("tcp://127.0.0.1:5000")
///     .expect("collector reachable");
/// ```
pub struct ShipperBuilder {
    formatter: StructuredFormatter,
    channel_size: usize,
    overflow_policy: OverflowPolicy,
    on_overflow: Option<OverflowCallback>,
    levels: Vec<LogLevel>,
    write_timeout: Option<Duration>,
}

impl ShipperBuilder {
    /// Queue capacity; zero selects [`DEFAULT_CHANNEL_SIZE`].
    #[must_use = "builder methods return a new value"]
    pub fn channel_size(mut self, size: usize) -> Self {
        self.channel_size = size;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn overflow_policy(mut self, policy: OverflowPolicy) -> Self {
        self.overflow_policy = policy;
        self
    }

    /// Called on the first dropped document and every 1000th after it.
    #[must_use = "builder methods return a new value"]
    pub fn on_overflow(mut self, callback: OverflowCallback) -> Self {
        self.on_overflow = Some(callback);
        self
    }

    /// Restrict the levels the shipper fires for.
    #[must_use = "builder methods return a new value"]
    pub fn levels(mut self, levels: &[LogLevel]) -> Self {
        self.levels = levels.to_vec();
        self
    }

    /// Write timeout for stream connections, [`DEFAULT_WRITE_TIMEOUT`] unless set.
    ///
    /// The connection is never re-dialed, so a collector that stalls longer
    /// than this stops shipping for good. `None` waits indefinitely instead;
    /// the queue then fills and the overflow policy takes over.
    #[must_use = "builder methods return a new value"]
    pub fn write_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.write_timeout = timeout;
        self
    }

    /// Dial `dsn` and start the delivery worker.
    pub fn connect(self, dsn: &str) -> Result<RemoteShipper> {
        let connection = dsn.parse::<Dsn>()?.connect(self.write_timeout)?;
        Ok(self.spawn(connection))
    }

    /// Start the delivery worker on an already open connection.
    pub fn spawn<W: Write + Send + 'static>(self, connection: W) -> RemoteShipper {
        let capacity = if self.channel_size == 0 {
            DEFAULT_CHANNEL_SIZE
        } else {
            self.channel_size
        };
        let (sender, receiver) = bounded(capacity);
        let metrics = Arc::new(LoggerMetrics::new());
        let worker_metrics = Arc::clone(&metrics);

        let handle = thread::Builder::new()
            .name("log-shipper".to_string())
            .spawn(move || deliver(receiver, connection, &worker_metrics));

        // without a worker nothing can be delivered; behave like a stopped shipper
        let (sender, worker) = match handle {
            Ok(handle) => (Some(sender), Some(handle)),
            Err(e) => {
                eprintln!("[LOGGER ERROR] Failed to start remote shipper: {}", e);
                (None, None)
            }
        };

        RemoteShipper {
            formatter: self.formatter,
            sender: RwLock::new(sender),
            worker: Mutex::new(worker),
            capacity,
            overflow_policy: self.overflow_policy,
            on_overflow: self.on_overflow,
            metrics,
            levels: self.levels,
        }
    }
}

/// Worker loop. The connection is never re-dialed: after the first failed
/// write every later document is counted as dropped.
fn deliver<W: Write>(receiver: Receiver<Vec<u8>>, mut connection: W, metrics: &LoggerMetrics) {
    let mut broken = false;

    for document in receiver.iter() {
        if broken {
            metrics.record_dropped();
            continue;
        }

        match connection.write_all(&document) {
            Ok(()) => {
                metrics.record_logged();
            }
            Err(e) => {
                broken = true;
                metrics.record_write_error();
                metrics.record_dropped();
                eprintln!("[LOGGER ERROR] Remote connection failed, shipping stopped: {}", e);
            }
        }
    }

    if !broken {
        let _ = connection.flush();
    }
}

/// Hook shipping JSON documents to a remote collector.
pub struct RemoteShipper {
    formatter: StructuredFormatter,
    sender: RwLock<Option<Sender<Vec<u8>>>>,
    worker: Mutex<Option<thread::JoinHandle<()>>>,
    capacity: usize,
    overflow_policy: OverflowPolicy,
    on_overflow: Option<OverflowCallback>,
    metrics: Arc<LoggerMetrics>,
    levels: Vec<LogLevel>,
}

impl RemoteShipper {
    pub fn builder(formatter: StructuredFormatter) -> ShipperBuilder {
        ShipperBuilder {
            formatter,
            channel_size: DEFAULT_CHANNEL_SIZE,
            overflow_policy: OverflowPolicy::default(),
            on_overflow: None,
            levels: LogLevel::ALL.to_vec(),
            write_timeout: Some(DEFAULT_WRITE_TIMEOUT),
        }
    }

    pub fn formatter(&self) -> &StructuredFormatter {
        &self.formatter
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Documents waiting for the worker.
    pub fn pending(&self) -> usize {
        self.sender.read().as_ref().map_or(0, Sender::len)
    }

    /// `total_logged` counts documents written to the connection.
    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    /// Queue a rendered document without blocking (unless the policy says so).
    pub fn enqueue(&self, document: Vec<u8>) {
        let guard = self.sender.read();
        let Some(sender) = guard.as_ref() else {
            self.metrics.record_dropped();
            return;
        };

        match sender.try_send(document) {
            Ok(()) => {}
            Err(TrySendError::Full(document)) => self.handle_overflow(sender, document),
            Err(TrySendError::Disconnected(_)) => {
                self.metrics.record_dropped();
            }
        }
    }

    fn handle_overflow(&self, sender: &Sender<Vec<u8>>, document: Vec<u8>) {
        self.metrics.record_queue_full();

        match &self.overflow_policy {
            OverflowPolicy::DropNewest => self.drop_document(),
            OverflowPolicy::Block => {
                self.metrics.record_block();
                if sender.send(document).is_err() {
                    self.drop_document();
                }
            }
            OverflowPolicy::BlockWithTimeout(timeout) => {
                self.metrics.record_block();
                if sender.send_timeout(document, *timeout).is_err() {
                    self.drop_document();
                }
            }
        }
    }

    fn drop_document(&self) {
        let dropped = self.metrics.record_dropped();
        let should_alert = dropped == 0 || (dropped + 1) % 1000 == 0;

        if should_alert {
            if let Some(ref callback) = self.on_overflow {
                callback(dropped + 1);
            }
        }
    }

    /// Close the queue and wait for the worker to drain it.
    ///
    /// Returns `false` when the worker did not finish within `timeout`.
    /// Documents logged afterwards are counted as dropped.
    pub fn shutdown(&self, timeout: Duration) -> bool {
        drop(self.sender.write().take());

        let Some(handle) = self.worker.lock().take() else {
            return true;
        };

        let start = Instant::now();
        loop {
            if handle.is_finished() {
                if let Err(e) = handle.join() {
                    eprintln!("[LOGGER ERROR] Remote shipper worker panicked: {:?}", e);
                    return false;
                }
                return true;
            }

            if start.elapsed() >= timeout {
                eprintln!(
                    "[LOGGER WARNING] Remote shipper did not drain within {:?}. \
                     Some documents may be lost.",
                    timeout
                );
                return false;
            }

            thread::sleep(Duration::from_millis(10));
        }
    }
}

impl Hook for RemoteShipper {
    fn levels(&self) -> &[LogLevel] {
        &self.levels
    }

    fn fire(&self, record: &LogRecord) -> Result<()> {
        let document = self.formatter.render(record).inspect_err(|_| {
            self.metrics.record_format_error();
        })?;
        self.enqueue(document);
        Ok(())
    }

    fn name(&self) -> &str {
        "remote"
    }
}

impl Drop for RemoteShipper {
    fn drop(&mut self) {
        self.shutdown(DEFAULT_SHUTDOWN_TIMEOUT);

        let dropped = self.metrics.dropped_count();
        if dropped > 0 {
            eprintln!(
                "[LOGGER WARNING] Remote shipper stopped with {} dropped documents (drop rate: {:.2}%)",
                dropped,
                self.metrics.drop_rate()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CallerLocation, Fields, FieldValue};
    use std::io::{BufRead, BufReader};
    use std::net::{TcpListener, UdpSocket};
    use std::sync::atomic::{AtomicU64, Ordering};

    fn formatter() -> StructuredFormatter {
        let mut identity = Fields::new();
        identity.insert("app_id".into(), "svc".into());
        StructuredFormatter::new(identity)
    }

    fn record(message: &str) -> LogRecord {
        LogRecord::new(LogLevel::Info, message).with_caller(CallerLocation::new("src/lib.rs", 1))
    }

    /// Accepts writes only after the test releases the gate.
    struct GatedWriter {
        gate: Receiver<()>,
    }

    impl Write for GatedWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            let _ = self.gate.recv();
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct BrokenWriter;

    impl Write for BrokenWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "peer went away"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_parse_dsn() {
        assert_eq!(
            "tcp://127.0.0.1:5000".parse::<Dsn>().unwrap(),
            Dsn::Tcp("127.0.0.1:5000".into())
        );
        assert_eq!(
            "UDP://logs:514".parse::<Dsn>().unwrap(),
            Dsn::Udp("logs:514".into())
        );
        assert!("127.0.0.1:5000".parse::<Dsn>().is_err());
        assert!("tcp://".parse::<Dsn>().is_err());
        assert!(matches!(
            "http://logs:80".parse::<Dsn>(),
            Err(LoggerError::InvalidDsn { .. })
        ));
    }

    #[test]
    fn test_connect_refused() {
        // bind then drop to get a port nobody listens on
        let port = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap().port();
        let result = RemoteShipper::builder(formatter()).connect(&format!("tcp://127.0.0.1:{}", port));
        assert!(matches!(result, Err(LoggerError::Connect { .. })));
    }

    #[test]
    fn test_ships_over_tcp() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let reader = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            BufReader::new(stream)
                .lines()
                .take(2)
                .map(|line| line.unwrap())
                .collect::<Vec<_>>()
        });

        let shipper = RemoteShipper::builder(formatter())
            .connect(&format!("tcp://{}", addr))
            .unwrap();
        shipper.fire(&record("first").with_field("k", 1)).unwrap();
        shipper.fire(&record("second")).unwrap();
        assert!(shipper.shutdown(Duration::from_secs(5)));

        let lines = reader.join().unwrap();
        let first: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
        let second: serde_json::Value = serde_json::from_str(&lines[1]).unwrap();
        assert_eq!(first["message"], "[src/lib.rs:1] first k=1");
        assert_eq!(first["app_id"], "svc");
        assert_eq!(second["message"], "[src/lib.rs:1] second");
        assert_eq!(shipper.metrics().total_logged(), 2);
    }

    #[test]
    fn test_ships_over_udp() {
        let collector = UdpSocket::bind("127.0.0.1:0").unwrap();
        collector.set_read_timeout(Some(Duration::from_secs(5))).unwrap();
        let addr = collector.local_addr().unwrap();

        let shipper = RemoteShipper::builder(formatter())
            .connect(&format!("udp://{}", addr))
            .unwrap();
        shipper.fire(&record("hi").with_field("k", 1)).unwrap();
        assert!(shipper.shutdown(Duration::from_secs(5)));

        // one document per datagram
        let mut buf = [0u8; 4096];
        let len = collector.recv(&mut buf).unwrap();
        assert_eq!(buf[len - 1], b'\n');
        let doc: serde_json::Value = serde_json::from_slice(&buf[..len]).unwrap();
        assert_eq!(doc["message"], "[src/lib.rs:1] hi k=1");
        assert_eq!(doc["app_id"], "svc");
        assert_eq!(doc["level"], "INFO");
        assert_eq!(shipper.metrics().total_logged(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_ships_over_unix_socket() {
        use std::os::unix::net::UnixListener;

        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("collector.sock");
        let listener = UnixListener::bind(&path).unwrap();
        let reader = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            BufReader::new(stream)
                .lines()
                .map(|line| line.unwrap())
                .collect::<Vec<_>>()
        });

        let shipper = RemoteShipper::builder(formatter())
            .write_timeout(None)
            .connect(&format!("unix://{}", path.display()))
            .unwrap();
        shipper.fire(&record("over the socket")).unwrap();
        assert!(shipper.shutdown(Duration::from_secs(5)));
        drop(shipper);

        let lines = reader.join().unwrap();
        assert_eq!(lines.len(), 1);
        let doc: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
        assert_eq!(doc["message"], "[src/lib.rs:1] over the socket");
    }

    #[test]
    fn test_full_queue_drops_without_blocking() {
        let (open, gate) = bounded::<()>(0);
        let calls = Arc::new(AtomicU64::new(0));
        let calls_clone = Arc::clone(&calls);

        let shipper = RemoteShipper::builder(formatter())
            .channel_size(1)
            .on_overflow(Arc::new(move |_count: u64| {
                calls_clone.fetch_add(1, Ordering::Relaxed);
            }))
            .spawn(GatedWriter { gate });

        for i in 0..10 {
            shipper.fire(&record(&format!("msg {}", i))).unwrap();
        }

        // at most one document in the worker and one in the queue
        assert!(shipper.metrics().dropped_count() >= 8);
        assert!(shipper.metrics().queue_full_events() >= 8);
        assert_eq!(calls.load(Ordering::Relaxed), 1);

        drop(open);
        assert!(shipper.shutdown(Duration::from_secs(5)));
    }

    #[test]
    fn test_block_with_timeout_gives_up() {
        let (_open, gate) = bounded::<()>(0);
        let shipper = RemoteShipper::builder(formatter())
            .channel_size(1)
            .overflow_policy(OverflowPolicy::BlockWithTimeout(Duration::from_millis(20)))
            .spawn(GatedWriter { gate });

        for i in 0..4 {
            shipper.fire(&record(&format!("msg {}", i))).unwrap();
        }

        assert!(shipper.metrics().block_events() >= 1);
        assert!(shipper.metrics().dropped_count() >= 1);
        drop(_open);
    }

    #[test]
    fn test_broken_connection_is_not_redialed() {
        let shipper = RemoteShipper::builder(formatter()).spawn(BrokenWriter);
        for i in 0..5 {
            shipper.fire(&record(&format!("msg {}", i))).unwrap();
        }
        assert!(shipper.shutdown(Duration::from_secs(5)));

        let metrics = shipper.metrics();
        assert_eq!(metrics.write_errors(), 1);
        assert_eq!(metrics.dropped_count(), 5);
        assert_eq!(metrics.total_logged(), 0);
    }

    #[test]
    fn test_format_error_surfaces() {
        let shipper = RemoteShipper::builder(formatter()).spawn(io::sink());
        let mut identity = Fields::new();
        identity.insert("app_id".into(), FieldValue::Float(f64::NAN));
        let bad = RemoteShipper::builder(StructuredFormatter::new(identity)).spawn(io::sink());

        assert!(bad.fire(&record("x")).is_err());
        assert_eq!(bad.metrics().format_errors(), 1);
        assert_eq!(bad.pending(), 0);
        assert!(shipper.fire(&record("x")).is_ok());
    }

    #[test]
    fn test_after_shutdown_documents_are_dropped() {
        let shipper = RemoteShipper::builder(formatter()).spawn(io::sink());
        assert!(shipper.shutdown(Duration::from_secs(5)));

        shipper.fire(&record("late")).unwrap();
        assert_eq!(shipper.metrics().dropped_count(), 1);
        assert!(shipper.shutdown(Duration::from_secs(1)));
    }
}
