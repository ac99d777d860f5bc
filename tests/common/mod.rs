use std::fs;
use std::path::Path;

pub fn create_sample_activity_json() -> &'static Path {
    let path = Path::new("tests/sample-data/activity.json");
    if !path.exists() {
        fs::create_dir_all("tests/sample-data").unwrap();
        fs::write(
            path,
            r#"{
  "project": "Walrus",
  "metrics": [
    {"key": "ncloc", "name": "Lines of Code", "type": "INT"},
    {"key": "coverage", "name": "Coverage", "type": "PERCENT"},
    {"key": "bugs", "name": "Bugs", "type": "INT"},
    {"key": "new_bugs", "name": "New Bugs", "type": "INT"},
    {"key": "internal_index", "name": "Internal Index", "type": "INT", "hidden": true},
    {"key": "team_velocity", "name": "Team Velocity", "type": "FLOAT", "custom": true}
  ],
  "measures": [
    {"metric": "ncloc", "history": [
      {"date": "2024-03-04", "value": 12000},
      {"date": "2024-03-11", "value": 12480},
      {"date": "2024-03-18", "value": 13950}
    ]},
    {"metric": "coverage", "history": [
      {"date": "2024-03-04", "value": 71.5},
      {"date": "2024-03-11", "value": 74.0},
      {"date": "2024-03-18", "value": 73.2}
    ]},
    {"metric": "bugs", "history": [
      {"date": "2024-03-04", "value": 31},
      {"date": "2024-03-11", "value": 27},
      {"date": "2024-03-18", "value": 24}
    ]}
  ]
}"#,
        )
        .unwrap();
    }
    path
}
