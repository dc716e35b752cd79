//! # Archivos Estáticos
//! src/files/mod.rs
//!
//! Lectura y escritura de archivos bajo el directorio raíz configurado.
//!
//! Todo nombre recibido en `/files/{name}` se resuelve contra la raíz
//! canonicalizada y se rechaza si intenta salir de ella (`..`, rutas
//! absolutas, symlinks que apuntan afuera).
//!
//! Las escrituras van a un archivo temporal hermano que luego se renombra
//! sobre el destino: un lector concurrente ve el contenido viejo o el
//! nuevo, nunca uno a medias.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

/// Contador para nombres de archivos temporales únicos dentro del proceso
static TMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Errores de acceso a archivos
#[derive(Debug)]
pub enum FileError {
    /// El archivo (o su directorio padre) no existe
    NotFound,

    /// El nombre pedido no es válido o sale de la raíz
    InvalidPath(String),

    /// Cualquier otra falla de I/O
    Io(io::Error),
}

impl std::fmt::Display for FileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileError::NotFound => write!(f, "File not found"),
            FileError::InvalidPath(p) => write!(f, "Invalid file path: {}", p),
            FileError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for FileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FileError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for FileError {
    fn from(e: io::Error) -> Self {
        if e.kind() == io::ErrorKind::NotFound {
            FileError::NotFound
        } else {
            FileError::Io(e)
        }
    }
}

/// Acceso a archivos confinado a un directorio raíz
#[derive(Debug, Clone)]
pub struct FileStore {
    /// Raíz canonicalizada
    root: PathBuf,
}

impl FileStore {
    /// Crea el store canonicalizando la raíz
    ///
    /// Falla si la raíz no existe o no es un directorio.
    pub fn new(root: impl AsRef<Path>) -> Result<Self, FileError> {
        let root = fs::canonicalize(root.as_ref())?;
        if !root.is_dir() {
            return Err(FileError::InvalidPath(root.display().to_string()));
        }
        Ok(Self { root })
    }

    /// Raíz canonicalizada
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Lee el archivo completo
    ///
    /// # Ejemplo
    /// ```
    /// use mini_http_server::files::{FileError, FileStore};
    ///
    /// let store = FileStore::new(".").unwrap();
    /// assert!(matches!(store.read_file("../etc/passwd"), Err(FileError::InvalidPath(_))));
    /// ```
    pub fn read_file(&self, name: &str) -> Result<Vec<u8>, FileError> {
        let path = self.resolve(name)?;
        let canonical = fs::canonicalize(&path)?;
        self.ensure_inside(&canonical, name)?;
        Ok(fs::read(&canonical)?)
    }

    /// Crea o reemplaza el archivo con `content`
    ///
    /// El directorio padre debe existir dentro de la raíz.
    pub fn write_file(&self, name: &str, content: &[u8]) -> Result<(), FileError> {
        let path = self.resolve(name)?;

        // resolve garantiza al menos un componente Normal
        let (parent, file_name) = match (path.parent(), path.file_name()) {
            (Some(parent), Some(file_name)) => (parent, file_name),
            _ => return Err(FileError::InvalidPath(name.to_string())),
        };

        let parent = fs::canonicalize(parent)?;
        self.ensure_inside(&parent, name)?;
        let target = parent.join(file_name);

        let tmp = parent.join(format!(
            ".{}.{}.{}.tmp",
            file_name.to_string_lossy(),
            std::process::id(),
            TMP_COUNTER.fetch_add(1, Ordering::Relaxed)
        ));

        let result = Self::write_new(&tmp, content).and_then(|_| fs::rename(&tmp, &target));
        if result.is_err() {
            // Puede no existir si falló la creación
            let _ = fs::remove_file(&tmp);
        }
        result.map_err(FileError::Io)
    }

    fn write_new(path: &Path, content: &[u8]) -> io::Result<()> {
        let mut file = OpenOptions::new().write(true).create_new(true).open(path)?;
        file.write_all(content)?;
        file.sync_all()
    }

    /// Une `name` a la raíz aceptando solo componentes normales
    fn resolve(&self, name: &str) -> Result<PathBuf, FileError> {
        // components() descarta la barra final: "a/" sería el archivo "a"
        if name.is_empty() || name.ends_with('/') {
            return Err(FileError::InvalidPath(name.to_string()));
        }

        let mut resolved = self.root.clone();
        for component in Path::new(name).components() {
            match component {
                Component::Normal(part) => resolved.push(part),
                _ => return Err(FileError::InvalidPath(name.to_string())),
            }
        }
        Ok(resolved)
    }

    fn ensure_inside(&self, canonical: &Path, name: &str) -> Result<(), FileError> {
        if canonical.starts_with(&self.root) {
            Ok(())
        } else {
            Err(FileError::InvalidPath(name.to_string()))
        }
    }
}
