use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};

use crate::core::HvError;

/// The objective values of a front collected at a given generation. This is used to store fronts
/// to JSON files and calculate their hyper-volume later on, for example to track the convergence
/// of an algorithm.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FrontExport {
    /// The name of the algorithm or process that generated the front.
    pub name: String,
    /// The objective values. Each item is a point with one value per objective. All objectives
    /// are minimised.
    pub objective_values: Vec<Vec<f64>>,
    /// The generation the front was collected at.
    pub generation: usize,
    /// The time when the front was collected.
    pub exported_on: DateTime<Utc>,
}

impl FrontExport {
    /// Collect a front now.
    ///
    /// # Arguments
    ///
    /// * `name`: The name of the algorithm or process that generated the front.
    /// * `objective_values`: The objective values.
    /// * `generation`: The generation the front was collected at.
    ///
    /// returns: `FrontExport`
    pub fn new(name: &str, objective_values: Vec<Vec<f64>>, generation: usize) -> Self {
        Self {
            name: name.to_string(),
            objective_values,
            generation,
            exported_on: Utc::now(),
        }
    }

    /// Save the front to a JSON file named `<prefix>_<name>_gen<generation>.json` in the
    /// `destination` folder. This returns an error if the file cannot be saved.
    ///
    /// # Arguments
    ///
    /// * `destination`: The folder where to save the file.
    /// * `file_prefix`: A prefix to prepend at the beginning of the file name. This is `History`
    ///    when `None`.
    ///
    /// returns: `Result<PathBuf, HvError>`: the path to the saved file.
    pub fn save_to_json(
        &self,
        destination: &Path,
        file_prefix: Option<&str>,
    ) -> Result<PathBuf, HvError> {
        let file_prefix = file_prefix.unwrap_or("History");
        if !destination.is_dir() {
            return Err(HvError::Export(format!(
                "The destination folder '{:?}' does not exist",
                destination
            )));
        }

        let data = serde_json::to_string_pretty(&self).map_err(|e| {
            HvError::Export(format!(
                "The following error occurred while converting the front: {e}"
            ))
        })?;
        let file = destination.join(format!(
            "{}_{}_gen{}.json",
            file_prefix, self.name, self.generation
        ));

        info!("Saving JSON file {:?}", file);
        fs::write(&file, data).map_err(|e| {
            HvError::Export(format!(
                "The following error occurred while exporting the front JSON file: {e}",
            ))
        })?;
        Ok(file)
    }

    /// Read a front previously exported with [`FrontExport::save_to_json`].
    ///
    /// # Arguments
    ///
    /// * `file`: The path to the JSON file.
    ///
    /// returns: `Result<FrontExport, HvError>`
    pub fn read_json_file(file: &Path) -> Result<Self, HvError> {
        if !file.exists() {
            return Err(HvError::Import(format!(
                "The file {:?} does not exist",
                file
            )));
        }
        let data = fs::read_to_string(file).map_err(|e| {
            HvError::Import(format!("Cannot read the file {:?} because: {e}", file))
        })?;
        serde_json::from_str(&data).map_err(|e| {
            HvError::Import(format!("Cannot parse the JSON file {:?} because: {e}", file))
        })
    }

    /// Read all the fronts exported to the JSON files in a folder. Files without the `json`
    /// extension are skipped.
    ///
    /// # Arguments
    ///
    /// * `folder`: The folder with the JSON files.
    ///
    /// returns: `Result<Vec<FrontExport>, HvError>`
    pub fn read_json_files(folder: &Path) -> Result<Vec<Self>, HvError> {
        let entries = fs::read_dir(folder).map_err(|e| {
            HvError::Import(format!("Cannot read the folder {:?} because: {e}", folder))
        })?;

        let mut fronts = vec![];
        for entry in entries {
            let path = entry
                .map_err(|e| HvError::Import(format!("Cannot read the folder entry: {e}")))?
                .path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
                fronts.push(Self::read_json_file(&path)?);
            }
        }
        Ok(fronts)
    }
}

#[cfg(test)]
mod test {
    use std::env;
    use std::fs;
    use std::path::PathBuf;

    use crate::core::FrontExport;

    /// Create an empty folder in the temporary directory.
    fn temp_folder(name: &str) -> PathBuf {
        let folder = env::temp_dir().join(format!("hvsweep_{}_{}", name, std::process::id()));
        if folder.exists() {
            fs::remove_dir_all(&folder).unwrap();
        }
        fs::create_dir_all(&folder).unwrap();
        folder
    }

    #[test]
    fn test_save_and_read() {
        let folder = temp_folder("save_and_read");
        let front = FrontExport::new("NSGA2", vec![vec![1.0, 2.0], vec![2.0, 1.0]], 10);
        let file = front.save_to_json(&folder, None).unwrap();

        assert_eq!(file.file_name().unwrap(), "History_NSGA2_gen10.json");
        assert_eq!(FrontExport::read_json_file(&file).unwrap(), front);
        fs::remove_dir_all(folder).unwrap();
    }

    #[test]
    fn test_read_json_files() {
        let folder = temp_folder("read_json_files");
        for generation in [1, 5] {
            FrontExport::new("MOCMA", vec![vec![1.0, 2.0]], generation)
                .save_to_json(&folder, Some("Front"))
                .unwrap();
        }
        fs::write(folder.join("notes.txt"), "not a front").unwrap();

        let mut generations: Vec<usize> = FrontExport::read_json_files(&folder)
            .unwrap()
            .iter()
            .map(|f| f.generation)
            .collect();
        generations.sort();
        assert_eq!(generations, vec![1, 5]);
        fs::remove_dir_all(folder).unwrap();
    }

    #[test]
    fn test_errors() {
        let missing = env::temp_dir().join("hvsweep_missing_folder_for_sure");
        let front = FrontExport::new("NSGA2", vec![], 0);
        assert!(front
            .save_to_json(&missing, None)
            .unwrap_err()
            .to_string()
            .contains("does not exist"));
        assert!(FrontExport::read_json_file(&missing.join("a.json"))
            .unwrap_err()
            .to_string()
            .contains("does not exist"));

        let folder = temp_folder("bad_json");
        let file = folder.join("bad.json");
        fs::write(&file, "{").unwrap();
        assert!(FrontExport::read_json_file(&file)
            .unwrap_err()
            .to_string()
            .contains("Cannot parse the JSON file"));
        fs::remove_dir_all(folder).unwrap();
    }
}
