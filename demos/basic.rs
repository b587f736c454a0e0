use circuit_gate::{Breaker, BreakerError, HookRegistry, Kinded};
use std::error::Error;
use std::fmt;
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Kind {
    Unavailable,
    NotFound,
}

#[derive(Debug)]
struct ServiceError {
    kind: Kind,
    message: String,
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Service error: {}", self.message)
    }
}

impl Error for ServiceError {}

impl Kinded for ServiceError {
    type Kind = Kind;

    fn kind(&self) -> Kind {
        self.kind
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let hooks = HookRegistry::new();
    hooks.set_on_rejected(|| println!("  (hook) call rejected"));
    hooks.set_on_failure(|| println!("  (hook) failure recorded"));

    // Three unavailable responses within ten seconds open the breaker for two.
    let breaker = Breaker::<String, ServiceError>::builder()
        .service("inventory")
        .threshold(3)
        .duration(Duration::from_secs(10))
        .reenable_after(Duration::from_secs(2))
        .ignore(Kind::NotFound)
        .hooks(hooks)
        .build();

    let call_service = |attempt: u32| -> Result<String, ServiceError> {
        match attempt {
            1 | 2 => Err(ServiceError {
                kind: Kind::NotFound,
                message: format!("item {} not found", attempt),
            }),
            3..=5 => Err(ServiceError {
                kind: Kind::Unavailable,
                message: "inventory backend unavailable".to_string(),
            }),
            _ => Ok(format!("item {}", attempt)),
        }
    };

    for attempt in 1..=10 {
        println!("\nAttempt {}: ", attempt);

        match breaker.run(|| call_service(attempt)) {
            Ok(result) => println!("Call succeeded with result: {}", result),
            Err(BreakerError::Open) => {
                println!("Circuit is open, waiting before retry...");
                thread::sleep(Duration::from_secs(1));
            }
            Err(BreakerError::Operation(err)) => {
                println!("Call failed with error: {}", err);
            }
        }

        println!("Breaker open: {}", breaker.is_open());
    }
}
