use std::path::Path;
use uuid::Uuid;

/// Extensión aplicada cuando el nombre original no aporta una utilizable
const DEFAULT_EXTENSION: &str = "bin";

/// Generador de identificadores opacos de archivo.
///
/// Un UUID v4 por archivo: 122 bits de entropía, probabilidad de colisión
/// despreciable. No se comprueba unicidad contra el almacén; la restricción
/// UNIQUE del repositorio es el respaldo.
pub struct IdGenerator;

impl IdGenerator {
    /// Genera un nuevo identificador de archivo
    pub fn new_file_id() -> String {
        Uuid::new_v4().to_string()
    }

    /// Deriva el nombre almacenado a partir del identificador y el nombre
    /// original, conservando la extensión.
    ///
    /// El nombre original nunca se usa para acceso a disco; solo se extrae
    /// de él una extensión saneada (alfanumérica, en minúsculas).
    pub fn stored_name_for(id: &str, original_name: &str) -> String {
        format!("{}.{}", id, Self::sanitized_extension(original_name))
    }

    fn sanitized_extension(original_name: &str) -> String {
        let extension = Path::new(original_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .filter(|e| {
                !e.is_empty() && e.len() <= 10 && e.chars().all(|c| c.is_ascii_alphanumeric())
            });

        extension.unwrap_or_else(|| DEFAULT_EXTENSION.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_ids_are_unique_and_printable() {
        let mut seen = HashSet::new();
        for _ in 0..1000 {
            let id = IdGenerator::new_file_id();
            assert!(id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-'));
            assert!(seen.insert(id));
        }
    }

    #[test]
    fn test_stored_name_preserves_extension() {
        let name = IdGenerator::stored_name_for("abc-123", "Informe Anual.PDF");
        assert_eq!(name, "abc-123.pdf");
    }

    #[test]
    fn test_stored_name_defaults_without_extension() {
        assert_eq!(IdGenerator::stored_name_for("abc", "README"), "abc.bin");
        assert_eq!(IdGenerator::stored_name_for("abc", ""), "abc.bin");
    }

    #[test]
    fn test_stored_name_rejects_hostile_extension() {
        // Una extensión que no sea alfanumérica no llega al disco
        assert_eq!(
            IdGenerator::stored_name_for("abc", "x.ext/../../etc"),
            "abc.bin"
        );
        assert_eq!(IdGenerator::stored_name_for("abc", "x.tar.gz"), "abc.gz");
    }
}
