//! Helpers
//!
//! Generador de códigos de entrega y utilidades menores compartidas.

use rand::Rng;

/// Generar un código de entrega de 6 dígitos, uniforme en
/// [100000, 999999].
///
/// El código NO es único por construcción: la unicidad la garantiza
/// la constraint UNIQUE de la tabla, con reintento en colisión al
/// crear la entrega.
pub fn generate_delivery_code() -> String {
    rand::thread_rng().gen_range(100_000..=999_999).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_six_digit_strings_in_range() {
        for _ in 0..10_000 {
            let code = generate_delivery_code();
            assert_eq!(code.len(), 6);
            let value: u32 = code.parse().expect("numeric code");
            assert!((100_000..=999_999).contains(&value));
        }
    }

    #[test]
    fn test_uniqueness_is_not_guaranteed() {
        // Documenta el hueco de diseño: con 900k códigos posibles las
        // colisiones son esperables; la unicidad vive en la base de
        // datos, no aquí. No se asume ni se asserta unicidad.
        let codes: Vec<String> = (0..100).map(|_| generate_delivery_code()).collect();
        assert_eq!(codes.len(), 100);
    }
}
