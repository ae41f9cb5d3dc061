//! Relational database (PostgreSQL or MariaDB).
//!
//! Debian-family and openSUSE packages initialize their data directory on
//! install or first start. Fedora/RHEL PostgreSQL and the Arch packages leave
//! that to the administrator, hence the guarded setup steps.

use crate::command_runner::Invocation;
use crate::package_manager::PackageManager;
use crate::plan::{ComponentKind, ComponentPlan, Guard};
use crate::types::DatabaseEngine;

const PG_VERSION_DNF: &str = "/var/lib/pgsql/data/PG_VERSION";
const PG_VERSION_PACMAN: &str = "/var/lib/postgres/data/PG_VERSION";
const MARIADB_SYSTEM_DB: &str = "/var/lib/mysql/mysql";

pub fn plan(pm: PackageManager, engine: DatabaseEngine) -> ComponentPlan {
    let base = ComponentPlan::new(ComponentKind::Database, engine.title());
    let plan = match engine {
        DatabaseEngine::Postgresql => postgresql(base, pm),
        DatabaseEngine::Mariadb => mariadb(base, pm),
    };
    plan.with_service(engine.service())
}

fn postgresql(base: ComponentPlan, pm: PackageManager) -> ComponentPlan {
    match pm {
        PackageManager::Apt => base.with_packages(&["postgresql"]),
        PackageManager::Dnf => base.with_packages(&["postgresql-server"]).with_setup(
            "Initialize PostgreSQL cluster",
            Guard::PathExists(PG_VERSION_DNF.to_string()),
            Invocation::mutation("postgresql-setup", ["--initdb"]),
        ),
        PackageManager::Pacman => base.with_packages(&["postgresql"]).with_setup(
            "Initialize PostgreSQL cluster",
            Guard::PathExists(PG_VERSION_PACMAN.to_string()),
            Invocation::mutation(
                "runuser",
                ["-u", "postgres", "--", "initdb", "-D", "/var/lib/postgres/data"],
            ),
        ),
        PackageManager::Zypper => base.with_packages(&["postgresql-server"]),
    }
}

fn mariadb(base: ComponentPlan, pm: PackageManager) -> ComponentPlan {
    match pm {
        PackageManager::Apt | PackageManager::Dnf => base.with_packages(&["mariadb-server"]),
        PackageManager::Pacman => base.with_packages(&["mariadb"]).with_setup(
            "Initialize MariaDB data directory",
            Guard::PathExists(MARIADB_SYSTEM_DB.to_string()),
            Invocation::mutation(
                "mariadb-install-db",
                ["--user=mysql", "--basedir=/usr", "--datadir=/var/lib/mysql"],
            ),
        ),
        PackageManager::Zypper => base.with_packages(&["mariadb"]),
    }
}
