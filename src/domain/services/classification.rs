use serde::{Serialize, Deserialize};

/// Categoría gruesa de un archivo, derivada del tipo MIME declarado.
///
/// Se calcula una sola vez al crear el archivo y se persiste como etiqueta;
/// sirve para filtrado y presentación, nunca para decidir almacenamiento.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileCategory {
    Image,
    Video,
    Audio,
    Pdf,
    Text,
    Document,
    Archive,
    Other,
}

impl FileCategory {
    /// Etiqueta en minúsculas tal como se persiste y se muestra
    pub fn as_str(&self) -> &'static str {
        match self {
            FileCategory::Image => "image",
            FileCategory::Video => "video",
            FileCategory::Audio => "audio",
            FileCategory::Pdf => "pdf",
            FileCategory::Text => "text",
            FileCategory::Document => "document",
            FileCategory::Archive => "archive",
            FileCategory::Other => "other",
        }
    }

    /// Reconstruye la categoría desde la etiqueta persistida
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "image" => FileCategory::Image,
            "video" => FileCategory::Video,
            "audio" => FileCategory::Audio,
            "pdf" => FileCategory::Pdf,
            "text" => FileCategory::Text,
            "document" => FileCategory::Document,
            "archive" => FileCategory::Archive,
            _ => FileCategory::Other,
        }
    }
}

impl std::fmt::Display for FileCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Deriva la categoría a partir del tipo MIME declarado.
///
/// Tabla de decisión fija, gana la primera coincidencia; los prefijos son
/// sensibles a mayúsculas.
pub fn category_of(mime_type: &str) -> FileCategory {
    if mime_type.starts_with("image/") {
        FileCategory::Image
    } else if mime_type.starts_with("video/") {
        FileCategory::Video
    } else if mime_type.starts_with("audio/") {
        FileCategory::Audio
    } else if mime_type == "application/pdf" {
        FileCategory::Pdf
    } else if mime_type.starts_with("text/") {
        FileCategory::Text
    } else if mime_type.contains("word") || mime_type.contains("document") {
        FileCategory::Document
    } else if mime_type.contains("zip") {
        FileCategory::Archive
    } else {
        FileCategory::Other
    }
}

const SIZE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// Formatea un tamaño en bytes de forma legible, escalando por 1024.
///
/// El cero es literal ("0 Bytes"), el resto con dos decimales en la unidad
/// más grande cuyo valor escalado sea >= 1.
pub fn format_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let exponent = (bytes.ilog(1024) as usize).min(SIZE_UNITS.len() - 1);
    let scaled = bytes as f64 / 1024_f64.powi(exponent as i32);

    format!("{:.2} {}", scaled, SIZE_UNITS[exponent])
}
