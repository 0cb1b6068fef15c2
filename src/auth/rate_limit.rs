//! Fixed-window per-IP limiter for the login endpoint.

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Mutex;
use std::time::{Duration, Instant};

pub struct RateLimiter {
    max_tentatives: u32,
    fenetre: Duration,
    entrees: Mutex<HashMap<IpAddr, (Instant, u32)>>,
}

impl RateLimiter {
    pub fn new(max_tentatives: u32, fenetre: Duration) -> Self {
        RateLimiter {
            max_tentatives,
            fenetre,
            entrees: Mutex::new(HashMap::new()),
        }
    }

    /// Returns true when the attempt is allowed.
    pub fn autoriser(&self, ip: IpAddr) -> bool {
        self.autoriser_a(ip, Instant::now())
    }

    fn autoriser_a(&self, ip: IpAddr, maintenant: Instant) -> bool {
        let mut entrees = self.entrees.lock().expect("verrou du limiteur empoisonné");

        // Opportunistic purge keeps the map bounded.
        if entrees.len() > 4096 {
            let fenetre = self.fenetre;
            entrees.retain(|_, (debut, _)| maintenant.duration_since(*debut) < fenetre);
        }

        let entree = entrees.entry(ip).or_insert((maintenant, 0));
        if maintenant.duration_since(entree.0) >= self.fenetre {
            *entree = (maintenant, 0);
        }
        entree.1 += 1;
        entree.1 <= self.max_tentatives
    }
}
