use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use ahash::HashMap;
use anyhow::{Context, Result, bail};
use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::assembly::Assembly;
use crate::report::{FilterReport, ReportHandle};

/// Call context for one service invocation.
///
/// Authentication happens outside this crate at context-setup time; the
/// context carries its result. Always passed explicitly, never ambient.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MethodContext {
    pub token: Option<String>,
    pub user_id: Option<String>,
    pub provenance: Vec<ProvenanceAction>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProvenanceAction {
    pub service: String,
    pub method: String,
    pub method_params: Vec<serde_json::Value>,
}

impl MethodContext {
    pub fn authenticated(token: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            user_id: Some(user_id.into()),
            provenance: Vec::new(),
        }
    }
}

/// Read/write seam onto the external object store.
pub trait AssemblyStore {
    /// Resolve a `workspaceId/objectId/version` reference to an assembly.
    fn get_assembly(&self, ctx: &MethodContext, reference: &str) -> Result<Assembly>;

    /// Persist an assembly under `name` in the named workspace, returning
    /// the reference of the newly created object.
    fn save_assembly(
        &self,
        ctx: &MethodContext,
        workspace: &str,
        name: &str,
        assembly: &Assembly,
    ) -> Result<String>;
}

/// Seam onto the report-generation service.
pub trait ReportStore {
    fn create_report(
        &self,
        ctx: &MethodContext,
        workspace: &str,
        report: &FilterReport,
    ) -> Result<ReportHandle>;
}

struct StoredObject {
    name: String,
    version: u64,
    path: PathBuf,
}

struct StoreState {
    next_workspace_id: u64,
    next_object_id: u64,
    n_reports: u64,
    // workspace name -> workspace id
    workspaces: HashMap<String, u64>,
    // (workspace id, object name) -> object id
    names: HashMap<(u64, String), u64>,
    // (workspace id, object id) -> latest saved object
    objects: HashMap<(u64, u64), StoredObject>,
}

impl StoreState {
    fn new() -> Self {
        Self {
            next_workspace_id: 1,
            next_object_id: 1,
            n_reports: 0,
            workspaces: HashMap::default(),
            names: HashMap::default(),
            objects: HashMap::default(),
        }
    }

    fn workspace_id(&mut self, name: &str) -> u64 {
        if let Some(id) = self.workspaces.get(name) {
            return *id;
        }
        let id = self.next_workspace_id;
        self.next_workspace_id += 1;
        self.workspaces.insert(name.to_string(), id);
        id
    }

    // Saving under an existing name bumps the version, otherwise a fresh
    // object id is allocated at version 1.
    fn allocate(&mut self, workspace_id: u64, name: &str) -> (u64, u64) {
        let key = (workspace_id, name.to_string());
        match self.names.get(&key) {
            Some(&object_id) => {
                let version = self
                    .objects
                    .get(&(workspace_id, object_id))
                    .map(|object| object.version + 1)
                    .unwrap_or(1);
                (object_id, version)
            }
            None => {
                let object_id = self.next_object_id;
                self.next_object_id += 1;
                self.names.insert(key, object_id);
                (object_id, 1)
            }
        }
    }
}

/// Directory-backed object store used by the test harness and local runs.
///
/// References follow the platform's `workspaceId/objectId/version` form.
/// Assemblies are persisted as FASTA files and reports as JSON under one
/// subdirectory per workspace. This is harness infrastructure standing in
/// for the platform store, not an implementation of it.
pub struct LocalWorkspace {
    root: PathBuf,
    ref_pattern: Regex,
    state: Mutex<StoreState>,
}

impl LocalWorkspace {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)
            .with_context(|| format!("Failed to create workspace root: {}", root.display()))?;

        Ok(Self {
            root,
            ref_pattern: Regex::new(r"^(\d+)/(\d+)/(\d+)$").unwrap(),
            state: Mutex::new(StoreState::new()),
        })
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    fn object_dir(&self, workspace_id: u64) -> Result<PathBuf> {
        let dir = self.root.join(workspace_id.to_string());
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create workspace directory: {}", dir.display()))?;
        Ok(dir)
    }
}

impl AssemblyStore for LocalWorkspace {
    fn get_assembly(&self, _ctx: &MethodContext, reference: &str) -> Result<Assembly> {
        let caps = match self.ref_pattern.captures(reference) {
            Some(caps) => caps,
            None => bail!("Invalid assembly reference: {}", reference),
        };
        let workspace_id: u64 = caps[1].parse()?;
        let object_id: u64 = caps[2].parse()?;
        let version: u64 = caps[3].parse()?;

        let state = self.state.lock().unwrap();
        let object = match state.objects.get(&(workspace_id, object_id)) {
            Some(object) if object.version == version => object,
            _ => bail!("No object with reference {}", reference),
        };

        Assembly::from_fasta(object.name.clone(), &object.path)
    }

    fn save_assembly(
        &self,
        ctx: &MethodContext,
        workspace: &str,
        name: &str,
        assembly: &Assembly,
    ) -> Result<String> {
        let mut state = self.state.lock().unwrap();
        let workspace_id = state.workspace_id(workspace);
        let (object_id, version) = state.allocate(workspace_id, name);

        let dir = self.object_dir(workspace_id)?;
        let path = dir.join(format!("{}.{}.fasta", object_id, version));
        assembly.to_fasta(&path)?;

        state.objects.insert(
            (workspace_id, object_id),
            StoredObject {
                name: name.to_string(),
                version,
                path,
            },
        );

        debug!(
            "Saved assembly {} as {}/{}/{} for {}",
            name,
            workspace_id,
            object_id,
            version,
            ctx.user_id.as_deref().unwrap_or("anonymous")
        );

        Ok(format!("{}/{}/{}", workspace_id, object_id, version))
    }
}

impl ReportStore for LocalWorkspace {
    fn create_report(
        &self,
        _ctx: &MethodContext,
        workspace: &str,
        report: &FilterReport,
    ) -> Result<ReportHandle> {
        let mut state = self.state.lock().unwrap();
        let workspace_id = state.workspace_id(workspace);

        state.n_reports += 1;
        let name = format!("contig_filter_report_{}", state.n_reports);
        let (object_id, version) = state.allocate(workspace_id, &name);

        let dir = self.object_dir(workspace_id)?;
        let path = dir.join(format!("{}.{}.report.json", object_id, version));
        let json = serde_json::to_string_pretty(report).context("Failed to serialize report")?;
        fs::write(&path, json)
            .with_context(|| format!("Failed to write report: {}", path.display()))?;

        state.objects.insert(
            (workspace_id, object_id),
            StoredObject {
                name: name.clone(),
                version,
                path,
            },
        );

        Ok(ReportHandle {
            name,
            reference: format!("{}/{}/{}", workspace_id, object_id, version),
        })
    }
}
