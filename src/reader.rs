use std::{
    io::BufRead,
    thread::{self, JoinHandle},
};

use crossbeam_channel::{select, Sender};

use crate::latency::parse_latency;
use crate::shutdown::Shutdown;

// Scan probe output and hand each latency to the main loop, one at a time.
// `tx` is expected to be a rendezvous channel, so every send waits for the
// consumer. Returns the number of samples delivered.
pub fn pump_lines<R: BufRead>(mut reader: R, tx: &Sender<f64>, shutdown: &Shutdown) -> usize {
    let mut delivered = 0;
    let mut buf = Vec::new();

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {}
            Err(err) => {
                tracing::warn!(%err, "failed to read probe output");
                break;
            }
        }
        if shutdown.is_triggered() {
            break;
        }

        // ping output is not always UTF-8 on localized systems
        let line = String::from_utf8_lossy(&buf);
        let Ok(latency) = parse_latency(&line) else {
            continue;
        };
        tracing::trace!(latency_ms = latency, "sample");

        let sent = select! {
            send(tx, latency) -> res => res.is_ok(),
            recv(shutdown.receiver()) -> _ => false,
        };
        if !sent {
            break;
        }
        delivered += 1;
    }

    delivered
}

pub fn spawn_reader<R>(reader: R, tx: Sender<f64>, shutdown: Shutdown) -> JoinHandle<()>
where
    R: BufRead + Send + 'static,
{
    thread::spawn(move || {
        let delivered = pump_lines(reader, &tx, &shutdown);
        tracing::info!(delivered, "probe output closed");
    })
}
