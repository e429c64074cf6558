#![allow(dead_code)]

use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const COMPUTE_NS: &str = "example.com/cloud/compute/models";
pub const APIS_NS: &str = "example.com/cloud/apis/compute";

/// A small cloud-style graph: one base namespace, one compute namespace with
/// a routed server model, an unrouted disk model and a closure type.
pub const GRAPH_YAML: &str = r#"
types:
  - name: example.com/cloud/db.SModelBase
    kind: struct
  - name: example.com/cloud/db.SStandaloneResourceBase
    kind: struct
    members:
      - { name: SModelBase, type: example.com/cloud/db.SModelBase, embedded: true }
      - { name: Id, type: string, tags: 'json:"id"' }
      - { name: Name, type: string, tags: 'json:"name"' }
  - name: context.Context
    kind: interface
  - name: example.com/cloud/mcclient.TokenCredential
    kind: interface
  - name: example.com/x/jsonutils.JSONObject
    kind: interface
  - name: example.com/cloud/apis/compute.ServerCreateInput
    kind: struct
  - name: example.com/cloud/apis/compute.ServerListInput
    kind: struct
  - name: example.com/cloud/apis/compute.ServerMigrateInput
    kind: struct
  - name: example.com/cloud/compute/models.TriState
    kind: alias
    underlying: string
  - name: example.com/cloud/compute/models.SNic
    kind: struct
    members:
      - { name: Mac, type: string }
      - { name: Index, type: int }
  - name: example.com/cloud/compute/models.SServer
    kind: struct
    comments: ["SServer is a virtual machine"]
    members:
      - { name: SStandaloneResourceBase, type: example.com/cloud/db.SStandaloneResourceBase, embedded: true }
      - { name: Status, type: string, tags: 'json:"status"' }
      - { name: AutoStart, type: example.com/cloud/compute/models.TriState }
      - { name: Nics, type: "[]example.com/cloud/compute/models.SNic" }
      - { name: secret, type: string }
    methods:
      - name: GetExtraDetails
        params: [context.Context, example.com/cloud/mcclient.TokenCredential, example.com/x/jsonutils.JSONObject]
        results: [example.com/x/jsonutils.JSONObject, error]
      - name: ValidateUpdateData
        params: [context.Context, example.com/cloud/mcclient.TokenCredential, example.com/x/jsonutils.JSONObject, example.com/x/jsonutils.JSONObject]
        results: [example.com/x/jsonutils.JSONObject, error]
      - name: CustomizeDelete
        params: [context.Context, example.com/cloud/mcclient.TokenCredential, example.com/x/jsonutils.JSONObject, example.com/x/jsonutils.JSONObject]
        results: [error]
      - name: PerformMigrate
        params: [context.Context, example.com/cloud/mcclient.TokenCredential, example.com/x/jsonutils.JSONObject, "*example.com/cloud/apis/compute.ServerMigrateInput"]
        results: [example.com/x/jsonutils.JSONObject, error]
      - name: PerformSyncStatus
        params: [context.Context, example.com/cloud/mcclient.TokenCredential]
        results: [error]
  - name: example.com/cloud/compute/models.SServerManager
    kind: struct
    methods:
      - name: ValidateCreateData
        params: [context.Context, example.com/cloud/mcclient.TokenCredential, example.com/x/jsonutils.JSONObject, example.com/x/jsonutils.JSONObject, example.com/cloud/apis/compute.ServerCreateInput]
        results: [example.com/cloud/apis/compute.ServerCreateInput, error]
      - name: ListItemFilter
        params: [context.Context, example.com/x/jsonutils.JSONObject, example.com/cloud/mcclient.TokenCredential, example.com/cloud/apis/compute.ServerListInput]
        results: [example.com/x/jsonutils.JSONObject, error]
  - name: example.com/cloud/compute/models.SDisk
    kind: struct
    members:
      - { name: SStandaloneResourceBase, type: example.com/cloud/db.SStandaloneResourceBase, embedded: true }
      - { name: DiskSize, type: int64 }
"#;

pub const CONFIG_TOML: &str = r#"
[classifier]
base_namespace = "cloud/db"

[projection]
output_namespace = "example.com/cloud/apis/compute"

[synthesis]
strict_shapes = false

[[managers]]
type = "example.com/cloud/compute/models.SServerManager"
keyword = "server"
keyword_plural = "servers"
service = "compute"
"#;

/// Temporary directory holding `graph.yaml` and, optionally, `modelgen.toml`
pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    pub fn new(with_config: bool) -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        std::fs::write(dir.path().join("graph.yaml"), GRAPH_YAML).expect("write graph");
        if with_config {
            std::fs::write(dir.path().join("modelgen.toml"), CONFIG_TOML).expect("write config");
        }
        Workspace { dir }
    }

    pub fn graph(&self) -> PathBuf {
        self.dir.path().join("graph.yaml")
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.path(name);
        std::fs::write(&path, contents).expect("write file");
        path
    }

    pub fn read(&self, path: &Path) -> String {
        std::fs::read_to_string(path).expect("read file")
    }
}
