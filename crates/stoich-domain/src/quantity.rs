//! Conversiones puras entre masa (gramos) y cantidad de sustancia (moles).
//!
//! Usadas por el motor de recálculo para invertir ediciones virtuales
//! (moles → masa) y por cualquier columna derivada de sólo lectura.
//! `None` significa "aún no conocido", nunca cero: un cero implicaría masa
//! nula, no masa desconocida, y sería químicamente engañoso.

/// Moles a partir de una masa en gramos.
///
/// Devuelve `None` si la masa no está definida o si el peso molecular no es
/// estrictamente positivo (un peso inválido no produce una cantidad).
pub fn moles_from_mass(mass: Option<f64>, molecular_weight: f64) -> Option<f64> {
    match mass {
        Some(grams) if molecular_weight > 0.0 => Some(grams / molecular_weight),
        _ => None,
    }
}

/// Inversa de `moles_from_mass`: gramos a partir de moles.
pub fn mass_from_moles(moles: Option<f64>, molecular_weight: f64) -> Option<f64> {
    match moles {
        Some(n) if molecular_weight > 0.0 => Some(n * molecular_weight),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_moles_from_mass_basic() {
        // 18 g of water (MW 18.015) is about one mole
        let n = moles_from_mass(Some(18.015), 18.015).unwrap();
        assert_relative_eq!(n, 1.0, max_relative = 1e-12);
    }

    #[test]
    fn test_unknown_mass_stays_unknown() {
        assert_eq!(moles_from_mass(None, 18.015), None);
        assert_eq!(mass_from_moles(None, 18.015), None);
    }

    #[test]
    fn test_invalid_weight_yields_none() {
        assert_eq!(moles_from_mass(Some(10.0), 0.0), None);
        assert_eq!(moles_from_mass(Some(10.0), -5.0), None);
        assert_eq!(mass_from_moles(Some(2.0), 0.0), None);
    }

    #[test]
    fn test_round_trip() {
        let mw = 78.11;
        let grams = mass_from_moles(Some(0.25), mw);
        let back = moles_from_mass(grams, mw).unwrap();
        assert_relative_eq!(back, 0.25, max_relative = 1e-12);
    }
}
