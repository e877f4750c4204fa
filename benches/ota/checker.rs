use criterion::{BatchSize, Criterion, Throughput};
use libota::network::application::http::Url;
use libota::network::error::Error;
use libota::network::tls::{Endpoint, SecureConnect, TrustAnchor};
use libota::network::{Close, Connection, Read, Write};
use libota::ota::{Decision, Scheduler, VersionChecker};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::hint::black_box;

const ROOT_CA: &str = "-----BEGIN CERTIFICATE-----\nMDEy\n-----END CERTIFICATE-----\n";
const VERSION_URL: &str = "https://fw.example.com/fw/bin_version.txt";

struct MemoryConnection {
    incoming: &'static [u8],
    pos: usize,
}

impl Read for MemoryConnection {
    type Error = Error;
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let n = buf.len().min(self.incoming.len() - self.pos);
        buf[..n].copy_from_slice(&self.incoming[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

impl Write for MemoryConnection {
    type Error = Error;
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl Close for MemoryConnection {
    type Error = Error;
    fn close(self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl Connection for MemoryConnection {}

struct MemoryConnector {
    response: &'static [u8],
}

impl SecureConnect for MemoryConnector {
    type Connection = MemoryConnection;
    type Error = Error;
    fn connect(&mut self, _endpoint: &Endpoint<'_>) -> Result<Self::Connection, Self::Error> {
        Ok(MemoryConnection {
            incoming: self.response,
            pos: 0,
        })
    }
}

fn checker() -> VersionChecker<'static> {
    VersionChecker::new(
        Url::parse(VERSION_URL).expect("valid URL"),
        "1.3.2",
        TrustAnchor::from_pem(ROOT_CA).expect("valid PEM"),
    )
}

fn bench_response(c: &mut Criterion, name: &str, response: &'static [u8], expected: Decision) {
    let checker = checker();
    let mut group = c.benchmark_group("version_check");
    group.throughput(Throughput::Bytes(response.len() as u64));
    group.bench_function(name, |b| {
        b.iter_batched_ref(
            || (MemoryConnector { response }, StdRng::seed_from_u64(1)),
            |(connector, rng)| {
                let decision = checker.check(connector, rng);
                assert_eq!(decision, expected);
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

pub fn bench_check_up_to_date(c: &mut Criterion) {
    bench_response(
        c,
        "up_to_date",
        b"HTTP/1.1 200 OK\r\nContent-Length: 6\r\n\r\n1.3.2\n",
        Decision::UpToDate,
    );
}

pub fn bench_check_update_available(c: &mut Criterion) {
    bench_response(
        c,
        "update_available",
        b"HTTP/1.1 200 OK\r\nConnection: close\r\n\r\n1.3.3",
        Decision::UpdateAvailable,
    );
}

pub fn bench_scheduler_poll(c: &mut Criterion) {
    c.bench_function("scheduler_poll", |b| {
        let mut scheduler = Scheduler::new(60_000, 0);
        let mut now = 0u32;
        b.iter(|| {
            now = now.wrapping_add(997);
            black_box(scheduler.poll(black_box(now)))
        })
    });
}
