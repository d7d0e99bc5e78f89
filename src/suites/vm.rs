//! Server definition lifecycle fixtures: input validation on the define
//! endpoints, disk and NIC management, node placement and teardown. Most of
//! these were generated from recorded client output and pasted in.

use crate::expect::fragment;
use crate::harness::{Harness, SuiteState};
use crate::suites::accounts;
use crate::suites::{create_test_user, delete_test_user, require_ping};
use crate::test_case::TestCase;
use serde_json::{json, Value};

pub fn run(h: &mut Harness) {
    require_ping(h);
    create_test_user(h, false);
    accounts::login_user_ok(h);
    list_200(h);
    get_404(h);
    delete_404(h);
    create_404(h);
    define_list_200(h);
    status_list_200(h);
    define_create_403(h);
    define_disk_1_create_403(h);
    define_nic_1_create_403(h);
    accounts::logout_ok(h);
    accounts::login_admin_ok(h);
    list_200(h);

    define_create_400_1(h);
    define_create_400_2(h);
    define_create_400_3(h);
    define_create_400_4(h);
    define_create_201(h);
    define_get_200(h);

    define_disk_1_create_400(h);
    define_disk_1_create_201(h);
    define_disk_1_delete_200(h);
    define_disk_1_create_201(h);
    define_disk_2_create_400_1(h);
    define_disk_2_create_400_2(h);
    define_disk_3_create_406(h);
    define_disk_2_create_201(h);
    define_disk_2_set_200(h);
    define_disk_2_set_400(h);

    h.throttle();

    define_nic_1_create_400_1(h);
    define_nic_1_create_400_2(h);
    define_nic_1_create_201(h);
    define_nic_1_delete_200(h);
    define_nic_1_create_201(h);
    define_nic_2_create_400_1(h);
    define_nic_3_create_406(h);
    define_nic_1_get_200(h);
    define_nic_1_set_200_1(h);
    define_nic_1_set_200_2(h);
    define_nic_2_create_400_2(h);
    define_nic_2_create_201(h);
    define_nic_2_delete_200(h);

    define_set_200_1(h);
    define_set_400_1(h);
    define_disk_2_delete_200(h);
    define_set_200_2(h);

    define_set_200_3(h);
    define_set_400_2(h);
    define_create_406(h);
    define_create_400_5(h);
    accounts::logout_ok(h);
    accounts::login_user_ok(h);
    list_200_with_server(h);
    define_get_full_200(h);
    status_get_200(h);
    status_list_200_with_server(h);
    snapshot_list_200(h);
    create_403(h);
    accounts::logout_ok(h);
    accounts::login_admin_ok(h);
    accounts::user_delete_with_relations_400(h);
    define_set_200_4(h);
    define_delete_200(h);
    delete_test_user(h);
    list_logout_403(h);
}

fn result_is_list(text: &Value, _state: &mut SuiteState) -> bool {
    text.get("result").map_or(false, Value::is_array)
}

fn list_200(h: &mut Harness) {
    let exp = fragment(json!({"status": "SUCCESS"}));

    h.run(TestCase::new("vm_list_200", "get /vm", exp).verified_by(result_is_list));
}

fn list_logout_403(h: &mut Harness) {
    let exp = fragment(json!({"detail": "Authentication credentials were not provided."}));

    h.run(TestCase::new("vm_list_logout_403", "get /vm", exp)
        .status(403)
        .exit_code(1));
}

fn get_404(h: &mut Harness) {
    let exp = fragment(json!({"detail": "VM not found"}));

    h.run(TestCase::new("vm_get_404", "get /vm/test99.example.com", exp)
        .status(404)
        .exit_code(1));
}

fn delete_404(h: &mut Harness) {
    let exp = fragment(json!({"detail": "VM not found"}));

    h.run(TestCase::new("vm_delete_404", "delete /vm/test99.example.com", exp)
        .status(404)
        .exit_code(1));
}

fn create_404(h: &mut Harness) {
    let exp = fragment(json!({"detail": "VM not found"}));

    h.run(TestCase::new("vm_create_404", "create /vm/test99.example.com", exp)
        .status(404)
        .exit_code(1));
}

fn define_list_200(h: &mut Harness) {
    let exp = fragment(json!({"status": "SUCCESS", "result": []}));

    h.run(TestCase::new("vm_define_list_200", "get /vm/define", exp));
}

fn status_list_200(h: &mut Harness) {
    let exp = fragment(json!({"status": "SUCCESS", "result": []}));

    h.run(TestCase::new("vm_status_list_200", "get /vm/status", exp));
}

fn define_create_403(h: &mut Harness) {
    let exp = fragment(json!({"detail": "Permission denied"}));

    h.run(
        TestCase::new("vm_define_create_403", "create /vm/test99.example.com/define", exp)
            .status(403)
            .exit_code(1),
    );
}

fn define_disk_1_create_403(h: &mut Harness) {
    let exp = fragment(json!({"detail": "Permission denied"}));

    h.run(
        TestCase::new(
            "vm_define_disk_1_create_403",
            "create /vm/test99.example.com/define/disk/1",
            exp,
        )
        .status(403)
        .exit_code(1),
    );
}

fn define_nic_1_create_403(h: &mut Harness) {
    let exp = fragment(json!({"detail": "Permission denied"}));

    h.run(
        TestCase::new(
            "vm_define_nic_1_create_403",
            "create /vm/test99.example.com/define/nic/1",
            exp,
        )
        .status(403)
        .exit_code(1),
    );
}

// No input at all.
fn define_create_400_1(h: &mut Harness) {
    let exp = fragment(json!({
        "status": "FAILURE",
        "result": {
            "vcpus": ["This field is required."],
            "ram": ["This field is required."],
        },
    }));

    h.run(
        TestCase::new("vm_define_create_400_1", "create /vm/test99.example.com/define", exp)
            .status(400)
            .exit_code(1),
    );
}

// Values below every minimum.
fn define_create_400_2(h: &mut Harness) {
    let exp = fragment(json!({
        "status": "FAILURE",
        "result": {
            "ostype": ["Select a valid choice. 0 is not one of the available choices."],
            "vcpus": ["Ensure this value is greater than or equal to 1."],
            "ram": ["Ensure this value is greater than or equal to 32."],
        },
    }));

    h.run(
        TestCase::new(
            "vm_define_create_400_2",
            "create /vm/test99.example.com/define -ram 1 -vcpus 0 -ostype 0",
            exp,
        )
        .status(400)
        .exit_code(1),
    );
}

// Values above every maximum plus references to missing objects.
fn define_create_400_3(h: &mut Harness) {
    let command = "create /vm/test99.example.com/define -ram 999999 -vcpus 999 -ostype 999 \
                   -template nil -owner nil -node nil -hostname xx -alias yy";
    let exp = fragment(json!({
        "status": "FAILURE",
        "result": {
            "node": ["Object with hostname=nil does not exist."],
            "ram": ["Ensure this value is less than or equal to 524288."],
            "hostname": ["Ensure this value has at least 4 characters (it has 2)."],
            "owner": ["Object with username=nil does not exist."],
            "alias": ["Ensure this value has at least 4 characters (it has 2)."],
            "vcpus": ["Ensure this value is less than or equal to 64."],
            "template": ["Object with name=nil does not exist."],
            "ostype": ["Select a valid choice. 999 is not one of the available choices."],
        },
    }));

    h.run(TestCase::new("vm_define_create_400_3", command, exp)
        .status(400)
        .exit_code(1));
}

// Valid values, but more than the node has free.
fn define_create_400_4(h: &mut Harness) {
    let command = "create /vm/test99.example.com/define -alias test -owner test \
                   -node headnode.dev.erigones.com -ram 99999 -vcpus 24";
    let exp = fragment(json!({
        "status": "FAILURE",
        "result": {
            "node": ["Not enough free vCPUs on node.", "Not enough free RAM on node."],
        },
    }));

    h.run(TestCase::new("vm_define_create_400_4", command, exp)
        .status(400)
        .exit_code(1));
}

fn define_create_201(h: &mut Harness) {
    let command = "create /vm/test99.example.com/define -alias test -owner test -ram 99999 -vcpus 24";
    let exp = fragment(json!({
        "status": "SUCCESS",
        "result": {
            "node": null,
            "hostname": "test99.example.com",
            "ram": 99999,
            "ostype": 1,
            "alias": "test",
            "vcpus": 24,
            "template": null,
            "owner": "test",
        },
    }));

    h.run(TestCase::new("vm_define_create_201", command, exp).status(201));
}

fn define_get_200(h: &mut Harness) {
    let exp = fragment(json!({
        "status": "SUCCESS",
        "result": {
            "node": null,
            "hostname": "test99.example.com",
            "ram": 99999,
            "ostype": 1,
            "alias": "test",
            "vcpus": 24,
            "template": null,
            "owner": "test",
        },
    }));

    h.run(TestCase::new("vm_define_get_200", "get /vm/test99.example.com/define", exp));
}

fn define_disk_1_create_400(h: &mut Harness) {
    let command = "create /vm/test99.example.com/define/disk/1 -boot true -image centos-6 -size 9999";
    let exp = fragment(json!({
        "status": "FAILURE",
        "result": {
            "size": ["Cannot define smaller disk size than image size (10240)."],
        },
    }));

    h.run(TestCase::new("vm_define_disk_1_create_400", command, exp)
        .status(400)
        .exit_code(1));
}

fn define_disk_1_delete_200(h: &mut Harness) {
    let exp = fragment(json!({"status": "SUCCESS", "result": null}));

    h.run(TestCase::new(
        "vm_define_disk_1_delete_200",
        "delete /vm/test99.example.com/define/disk/1",
        exp,
    ));
}

fn define_disk_1_create_201(h: &mut Harness) {
    let command = "create /vm/test99.example.com/define/disk/1 -boot true -size 51200";
    let exp = fragment(json!({
        "status": "SUCCESS",
        "result": {
            "compression": "lz4",
            "image": null,
            "boot": true,
            "zpool": "zones",
            "model": "virtio",
            "size": 51200,
        },
    }));

    h.run(TestCase::new("vm_define_disk_1_create_201", command, exp).status(201));
}

fn define_disk_2_create_400_1(h: &mut Harness) {
    let exp = fragment(json!({
        "status": "FAILURE",
        "result": {"size": ["This field is required."]},
    }));

    h.run(
        TestCase::new(
            "vm_define_disk_2_create_400_1",
            "create /vm/test99.example.com/define/disk/2",
            exp,
        )
        .status(400)
        .exit_code(1),
    );
}

fn define_disk_2_create_400_2(h: &mut Harness) {
    let command = "create /vm/test99.example.com/define/disk/2 -model nil -size nil -image nil \
                   -boot true -compression nil -zpool nil";
    let exp = fragment(json!({
        "status": "FAILURE",
        "result": {
            "model": ["Select a valid choice. nil is not one of the available choices."],
            "boot": ["Cannot set boot flag on disks other than first disk."],
            "compression": ["Select a valid choice. nil is not one of the available choices."],
            "image": ["Object with name=nil does not exist."],
            "size": ["Enter a whole number."],
        },
    }));

    h.run(TestCase::new("vm_define_disk_2_create_400_2", command, exp)
        .status(400)
        .exit_code(1));
}

fn define_disk_3_create_406(h: &mut Harness) {
    let exp = fragment(json!({"detail": "VM disk out of range"}));

    h.run(
        TestCase::new(
            "vm_define_disk_3_create_406",
            "create /vm/test99.example.com/define/disk/3 -size 512",
            exp,
        )
        .status(406)
        .exit_code(1),
    );
}

fn define_disk_2_create_201(h: &mut Harness) {
    let command = "create /vm/test99.example.com/define/disk/2 -size 3000 -compression gzip -model ide";
    let exp = fragment(json!({
        "status": "SUCCESS",
        "result": {
            "compression": "gzip",
            "image": null,
            "boot": false,
            "zpool": "zones",
            "model": "ide",
            "size": 3000,
        },
    }));

    h.run(TestCase::new("vm_define_disk_2_create_201", command, exp).status(201));
}

fn define_disk_2_set_200(h: &mut Harness) {
    let exp = fragment(json!({"status": "SUCCESS", "result": {"size": 9999998}}));

    h.run(TestCase::new(
        "vm_define_disk_2_set_200",
        "set /vm/test99.example.com/define/disk/2 -size 9999998",
        exp,
    ));
}

fn define_disk_2_set_400(h: &mut Harness) {
    let exp = fragment(json!({
        "status": "FAILURE",
        "result": {"image": ["Cannot set image on disks other than first disk."]},
    }));

    h.run(
        TestCase::new(
            "vm_define_disk_2_set_400",
            "set /vm/test99.example.com/define/disk/2 -image blabla",
            exp,
        )
        .status(400)
        .exit_code(1),
    );
}

fn define_disk_2_delete_200(h: &mut Harness) {
    let exp = fragment(json!({"status": "SUCCESS", "result": null}));

    h.run(TestCase::new(
        "vm_define_disk_2_delete_200",
        "delete /vm/test99.example.com/define/disk/2",
        exp,
    ));
}

fn define_nic_1_delete_200(h: &mut Harness) {
    let exp = fragment(json!({"status": "SUCCESS", "result": null}));

    h.run(TestCase::new(
        "vm_define_nic_1_delete_200",
        "delete /vm/test99.example.com/define/nic/1",
        exp,
    ));
}

fn define_nic_1_create_400_1(h: &mut Harness) {
    let command = "create /vm/test99.example.com/define/nic/1 -ip nil -netmask nil -gateway nil \
                   -model nil -net nil";
    let exp = fragment(json!({
        "status": "FAILURE",
        "result": {
            "ip": ["Enter a valid IPv4 address."],
            "model": ["Select a valid choice. nil is not one of the available choices."],
            "net": ["Object with name=nil does not exist."],
        },
    }));

    h.run(TestCase::new("vm_define_nic_1_create_400_1", command, exp)
        .status(400)
        .exit_code(1));
}

fn define_nic_1_create_400_2(h: &mut Harness) {
    let exp = fragment(json!({
        "status": "FAILURE",
        "result": {"ip": ["Object with name=1.1.1.1 does not exist."]},
    }));

    h.run(
        TestCase::new(
            "vm_define_nic_1_create_400_2",
            "create /vm/test99.example.com/define/nic/1 -ip 1.1.1.1 -net lan",
            exp,
        )
        .status(400)
        .exit_code(1),
    );
}

fn define_nic_1_create_201(h: &mut Harness) {
    let command = "create /vm/test99.example.com/define/nic/1 -net lan -ip 10.10.91.30";
    let exp = fragment(json!({
        "status": "SUCCESS",
        "result": {
            "ip": "10.10.91.30",
            "gateway": "10.10.91.1",
            "netmask": "255.255.255.0",
            "dns": true,
            "model": "virtio",
            "net": "lan",
            "mac": null,
        },
    }));

    h.run(TestCase::new("vm_define_nic_1_create_201", command, exp).status(201));
}

fn define_nic_2_create_400_1(h: &mut Harness) {
    let command =
        "create /vm/test99.example.com/define/nic/2 -ip 10.10.91.50 -netmask 0.0.0.0 -gateway 10.10.91.1";
    let exp = fragment(json!({
        "status": "FAILURE",
        "result": {"net": ["This field is required."]},
    }));

    h.run(TestCase::new("vm_define_nic_2_create_400_1", command, exp)
        .status(400)
        .exit_code(1));
}

fn define_nic_3_create_406(h: &mut Harness) {
    let exp = fragment(json!({"detail": "VM NIC out of range"}));

    h.run(
        TestCase::new(
            "vm_define_nic_3_create_406",
            "create /vm/test99.example.com/define/nic/3 -net lan",
            exp,
        )
        .status(406)
        .exit_code(1),
    );
}

fn define_nic_1_get_200(h: &mut Harness) {
    let exp = fragment(json!({
        "status": "SUCCESS",
        "result": {
            "ip": "10.10.91.30",
            "gateway": "10.10.91.1",
            "netmask": "255.255.255.0",
            "dns": false,
            "model": "virtio",
            "net": "lan",
            "mac": null,
        },
    }));

    h.run(TestCase::new(
        "vm_define_nic_1_get_200",
        "get /vm/test99.example.com/define/nic/1",
        exp,
    ));
}

fn define_nic_1_set_200_1(h: &mut Harness) {
    let exp = fragment(json!({
        "status": "SUCCESS",
        "result": {
            "gateway": "10.10.91.1",
            "netmask": "255.255.255.0",
            "dns": false,
            "model": "virtio",
            "net": "lan",
            "mac": null,
        },
    }));

    h.run(TestCase::new(
        "vm_define_nic_1_set_200_1",
        "set /vm/test99.example.com/define/nic/1 -net lan",
        exp,
    ));
}

fn define_nic_1_set_200_2(h: &mut Harness) {
    let exp = fragment(json!({
        "status": "SUCCESS",
        "result": {
            "ip": "10.10.91.31",
            "gateway": "10.10.91.1",
            "netmask": "255.255.255.0",
            "dns": false,
            "model": "virtio",
            "net": "lan",
            "mac": null,
        },
    }));

    h.run(TestCase::new(
        "vm_define_nic_1_set_200_2",
        "set /vm/test99.example.com/define/nic/1 -ip 10.10.91.31",
        exp,
    ));
}

fn define_nic_2_create_400_2(h: &mut Harness) {
    let exp = fragment(json!({
        "status": "FAILURE",
        "result": {"ip": ["Object with name=10.10.91.31 is already taken."]},
    }));

    h.run(
        TestCase::new(
            "vm_define_nic_2_create_400_2",
            "create /vm/test99.example.com/define/nic/2 -net lan -ip 10.10.91.31",
            exp,
        )
        .status(400)
        .exit_code(1),
    );
}

fn define_nic_2_create_201(h: &mut Harness) {
    let exp = fragment(json!({"status": "SUCCESS"}));

    h.run(
        TestCase::new(
            "vm_define_nic_2_create_201",
            "create /vm/test99.example.com/define/nic/2 -net lan -model e1000",
            exp,
        )
        .status(201),
    );
}

fn define_nic_2_delete_200(h: &mut Harness) {
    let exp = fragment(json!({"status": "SUCCESS", "result": null}));

    h.run(TestCase::new(
        "vm_define_nic_2_delete_200",
        "delete /vm/test99.example.com/define/nic/2",
        exp,
    ));
}

// Remove the template.
fn define_set_200_1(h: &mut Harness) {
    let exp = fragment(json!({
        "status": "SUCCESS",
        "result": {
            "node": null,
            "hostname": "test99.example.com",
            "ram": 99999,
            "ostype": 1,
            "alias": "test",
            "vcpus": 24,
            "template": null,
            "owner": "test",
        },
    }));

    h.run(TestCase::new(
        "vm_define_set_200_1",
        "set /vm/test99.example.com/define -template null",
        exp,
    ));
}

// Placement must fail while the definition exceeds the node's resources.
fn define_set_400_1(h: &mut Harness) {
    let exp = fragment(json!({
        "status": "FAILURE",
        "result": {
            "node": [
                "Not enough free disk space on storage with zpool=zones.",
                "Not enough free vCPUs on node.",
                "Not enough free RAM on node.",
                "Not enough free disk space on node.",
            ],
        },
    }));

    h.run(
        TestCase::new(
            "vm_define_set_400_1",
            "set /vm/test99.example.com/define -node headnode.dev.erigones.com",
            exp,
        )
        .status(400)
        .exit_code(1),
    );
}

// Shrink the definition so it fits.
fn define_set_200_2(h: &mut Harness) {
    let exp = fragment(json!({
        "status": "SUCCESS",
        "result": {
            "node": null,
            "hostname": "test99.example.com",
            "ram": 4096,
            "ostype": 1,
            "alias": "test",
            "vcpus": 2,
            "template": null,
            "owner": "test",
        },
    }));

    h.run(TestCase::new(
        "vm_define_set_200_2",
        "set /vm/test99.example.com/define -vcpus 2 -ram 4096",
        exp,
    ));
}

// Placement succeeds now.
fn define_set_200_3(h: &mut Harness) {
    let exp = fragment(json!({
        "status": "SUCCESS",
        "result": {
            "node": "headnode.dev.erigones.com",
            "hostname": "test99.example.com",
            "ram": 4096,
            "ostype": 1,
            "alias": "test",
            "vcpus": 2,
            "template": null,
            "owner": "test",
        },
    }));

    h.run(TestCase::new(
        "vm_define_set_200_3",
        "set /vm/test99.example.com/define -node headnode.dev.erigones.com",
        exp,
    ));
}

// Rename works while a node is set.
fn define_set_200_4(h: &mut Harness) {
    let exp = fragment(json!({
        "status": "SUCCESS",
        "result": {
            "node": "headnode.dev.erigones.com",
            "hostname": "test77.example.com",
            "ram": 4096,
            "ostype": 1,
            "alias": "test77",
            "vcpus": 2,
            "template": null,
            "owner": "test",
        },
    }));

    h.run(TestCase::new(
        "vm_define_set_200_4",
        "set /vm/test99.example.com/define -hostname test77.example.com -alias test77",
        exp,
    ));
}

fn define_set_400_2(h: &mut Harness) {
    let exp = fragment(json!({
        "status": "FAILURE",
        "result": {"node": ["Object with hostname=node02.example.com does not exist."]},
    }));

    h.run(
        TestCase::new(
            "vm_define_set_400_2",
            "set /vm/test99.example.com/define -node node02.example.com",
            exp,
        )
        .status(400)
        .exit_code(1),
    );
}

// Duplicate hostname.
fn define_create_406(h: &mut Harness) {
    let exp = fragment(json!({"detail": "VM already exists"}));

    h.run(
        TestCase::new(
            "vm_define_create_406",
            "create /vm/test99.example.com/define -template Erigon.AG",
            exp,
        )
        .status(406)
        .exit_code(1),
    );
}

// Duplicate alias.
fn define_create_400_5(h: &mut Harness) {
    let command = "create /vm/test98.example.com/define -alias test -owner test -vcpus 1 \
                   -ram 4096 -ostype 2";
    let exp = fragment(json!({
        "status": "FAILURE",
        "result": {
            "alias": ["This server name is already in use. Please supply a different server name."],
        },
    }));

    h.run(TestCase::new("vm_define_create_400_5", command, exp)
        .status(400)
        .exit_code(1));
}

fn list_200_with_server(h: &mut Harness) {
    let exp = fragment(json!({"status": "SUCCESS", "result": ["test99.example.com"]}));

    h.run(TestCase::new("vm_list_200_with_server", "get /vm", exp));
}

fn define_get_full_200(h: &mut Harness) {
    let exp = fragment(json!({
        "status": "SUCCESS",
        "result": {
            "node": "#4e344a",
            "disks": [{
                "compression": "lz4",
                "image": null,
                "boot": true,
                "zpool": "zones",
                "model": "virtio",
                "size": 51200,
            }],
            "nics": [{
                "ip": "10.10.91.31",
                "gateway": "10.10.91.1",
                "netmask": "255.255.255.0",
                "dns": false,
                "model": "virtio",
                "net": "lan",
                "mac": null,
            }],
            "ram": 4096,
            "ostype": 1,
            "alias": "test",
            "vcpus": 2,
            "template": null,
            "owner": "test",
            "hostname": "test99.example.com",
        },
    }));

    h.run(TestCase::new(
        "vm_define_get_full_200",
        "get /vm/test99.example.com/define -full",
        exp,
    ));
}

fn status_get_200(h: &mut Harness) {
    let exp = fragment(json!({
        "status": "SUCCESS",
        "result": {
            "status": "notcreated",
            "alias": "test",
            "hostname": "test99.example.com",
            "status_change": null,
            "tasks": {},
        },
    }));

    h.run(TestCase::new(
        "vm_status_get_200",
        "get /vm/test99.example.com/status",
        exp,
    ));
}

fn status_list_200_with_server(h: &mut Harness) {
    let exp = fragment(json!({
        "status": "SUCCESS",
        "result": [{
            "status": "notcreated",
            "alias": "test",
            "hostname": "test99.example.com",
            "status_change": null,
            "tasks": {},
        }],
    }));

    h.run(TestCase::new("vm_status_list_200_with_server", "get /vm/status", exp));
}

fn snapshot_list_200(h: &mut Harness) {
    let exp = fragment(json!({"status": "SUCCESS", "result": []}));

    h.run(TestCase::new(
        "vm_snapshot_list_200",
        "get /vm/test99.example.com/snapshot",
        exp,
    ));
}

// Deploying a defined server needs more than server-owner rights.
fn create_403(h: &mut Harness) {
    let exp = fragment(json!({"detail": "You do not have permission to perform this action."}));

    h.run(TestCase::new("vm_create_403", "create /vm/test99.example.com", exp)
        .status(403)
        .exit_code(1));
}

fn define_delete_200(h: &mut Harness) {
    let exp = fragment(json!({"status": "SUCCESS", "result": null}));

    h.run(TestCase::new(
        "vm_define_delete_200",
        "delete /vm/test77.example.com/define",
        exp,
    ));
}
