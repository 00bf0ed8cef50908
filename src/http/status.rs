//! # Códigos de Estado HTTP
//! src/http/status.rs
//!
//! Códigos de estado que el servidor puede emitir. El conjunto es cerrado:
//!
//! - **2xx**: `200 OK` y `201 Created` (escritura de archivos)
//! - **4xx**: `404 Not Found` (ruta o archivo inexistente)
//! - **5xx**: `500 Internal Error` y `503 Service Unavailable` (cola llena)

/// Representa los códigos de estado HTTP que soporta nuestro servidor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK - La petición fue exitosa
    Ok = 200,

    /// 201 Created - Archivo escrito correctamente
    Created = 201,

    /// 404 Not Found - Ruta o recurso no encontrado
    NotFound = 404,

    /// 500 Internal Error - Fallo no recuperable al manejar la conexión
    InternalError = 500,

    /// 503 Service Unavailable - La cola de workers está llena
    ServiceUnavailable = 503,
}

impl StatusCode {
    /// Convierte el código a su valor numérico
    ///
    /// # Ejemplo
    /// ```
    /// use tiny_httpd::http::StatusCode;
    /// assert_eq!(StatusCode::Created.as_u16(), 201);
    /// ```
    pub fn as_u16(&self) -> u16 {
        *self as u16
    }

    /// Retorna el texto de razón (reason phrase) asociado al código
    ///
    /// # Ejemplo
    /// ```
    /// use tiny_httpd::http::StatusCode;
    /// assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
    /// assert_eq!(StatusCode::InternalError.reason_phrase(), "Internal Error");
    /// ```
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::Created => "Created",
            StatusCode::NotFound => "Not Found",
            StatusCode::InternalError => "Internal Error",
            StatusCode::ServiceUnavailable => "Service Unavailable",
        }
    }

    /// Verifica si el código indica error del servidor (5xx)
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.as_u16())
    }
}

impl std::fmt::Display for StatusCode {
    /// Formato: "200 OK"
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.as_u16(), self.reason_phrase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_values() {
        assert_eq!(StatusCode::Ok.as_u16(), 200);
        assert_eq!(StatusCode::Created.as_u16(), 201);
        assert_eq!(StatusCode::NotFound.as_u16(), 404);
        assert_eq!(StatusCode::InternalError.as_u16(), 500);
        assert_eq!(StatusCode::ServiceUnavailable.as_u16(), 503);
    }

    #[test]
    fn test_is_server_error() {
        assert!(!StatusCode::NotFound.is_server_error());
        assert!(StatusCode::InternalError.is_server_error());
        assert!(StatusCode::ServiceUnavailable.is_server_error());
    }

    #[test]
    fn test_display() {
        assert_eq!(StatusCode::Ok.to_string(), "200 OK");
        assert_eq!(StatusCode::Created.to_string(), "201 Created");
        assert_eq!(StatusCode::NotFound.to_string(), "404 Not Found");
        assert_eq!(StatusCode::InternalError.to_string(), "500 Internal Error");
    }
}
