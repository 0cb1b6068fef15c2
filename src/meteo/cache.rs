//! TTL cache injected into the weather service instead of a module-level
//! singleton, so expiry is testable with a fake clock.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

pub trait Horloge: Send + Sync {
    fn maintenant(&self) -> Instant;
}

pub struct HorlogeSysteme;

impl Horloge for HorlogeSysteme {
    fn maintenant(&self) -> Instant {
        Instant::now()
    }
}

pub struct TtlCache<V> {
    entrees: Mutex<HashMap<String, (V, Instant)>>,
    ttl: Duration,
    horloge: Arc<dyn Horloge>,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self::avec_horloge(ttl, Arc::new(HorlogeSysteme))
    }

    pub fn avec_horloge(ttl: Duration, horloge: Arc<dyn Horloge>) -> Self {
        TtlCache {
            entrees: Mutex::new(HashMap::new()),
            ttl,
            horloge,
        }
    }

    pub fn obtenir(&self, cle: &str) -> Option<V> {
        let maintenant = self.horloge.maintenant();
        let mut entrees = self.entrees.lock().expect("verrou du cache empoisonné");
        match entrees.get(cle) {
            Some((_, expiration)) if *expiration <= maintenant => {
                entrees.remove(cle);
                None
            }
            Some((valeur, _)) => Some(valeur.clone()),
            None => None,
        }
    }

    /// Writes the entry and evicts everything already expired, so the map
    /// stays bounded by the set of keys touched within one TTL window.
    pub fn inserer(&self, cle: String, valeur: V) {
        let maintenant = self.horloge.maintenant();
        let mut entrees = self.entrees.lock().expect("verrou du cache empoisonné");
        entrees.retain(|_, (_, expiration)| *expiration > maintenant);
        entrees.insert(cle, (valeur, maintenant + self.ttl));
    }

    pub fn taille(&self) -> usize {
        self.entrees.lock().expect("verrou du cache empoisonné").len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct HorlogeFixe {
        instant: Mutex<Instant>,
    }

    impl HorlogeFixe {
        fn new() -> Arc<Self> {
            Arc::new(HorlogeFixe {
                instant: Mutex::new(Instant::now()),
            })
        }

        fn avancer(&self, duree: Duration) {
            let mut instant = self.instant.lock().unwrap();
            *instant += duree;
        }
    }

    impl Horloge for HorlogeFixe {
        fn maintenant(&self) -> Instant {
            *self.instant.lock().unwrap()
        }
    }

    #[test]
    fn test_entree_servie_avant_expiration() {
        let horloge = HorlogeFixe::new();
        let cache = TtlCache::avec_horloge(Duration::from_secs(600), horloge.clone());

        cache.inserer("Dakar".to_string(), 31.5f64);
        horloge.avancer(Duration::from_secs(599));
        assert_eq!(cache.obtenir("Dakar"), Some(31.5));
    }

    #[test]
    fn test_entree_expiree_supprimee_a_la_lecture() {
        let horloge = HorlogeFixe::new();
        let cache = TtlCache::avec_horloge(Duration::from_secs(600), horloge.clone());

        cache.inserer("Dakar".to_string(), 31.5f64);
        horloge.avancer(Duration::from_secs(601));
        assert_eq!(cache.obtenir("Dakar"), None);
        assert_eq!(cache.taille(), 0);
    }

    #[test]
    fn test_eviction_a_l_ecriture() {
        let horloge = HorlogeFixe::new();
        let cache = TtlCache::avec_horloge(Duration::from_secs(600), horloge.clone());

        cache.inserer("Dakar".to_string(), 1.0f64);
        cache.inserer("Thies".to_string(), 2.0f64);
        horloge.avancer(Duration::from_secs(601));
        cache.inserer("Kaolack".to_string(), 3.0f64);
        assert_eq!(cache.taille(), 1);
        assert_eq!(cache.obtenir("Kaolack"), Some(3.0));
    }
}
