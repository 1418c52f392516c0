//! Per-entity row, payload, and response types, plus the validation rule
//! sets their write routes attach.

pub mod mascota;
pub mod notificacion;
pub mod propietario;

use chrono::Local;

/// Creation/update stamps are stored as free-form locale strings, not
/// timestamps.
pub fn fecha_local() -> String {
    Local::now().format("%d/%m/%Y %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fecha_local_shape() {
        let fecha = fecha_local();
        assert_eq!(fecha.len(), "01/01/2026 00:00:00".len());
        assert!(fecha.contains('/'));
        assert!(fecha.contains(':'));
    }
}
