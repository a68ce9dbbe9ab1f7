//! Pre-built mock hosts.
//!
//! These describe realistic `/etc`, `/proc` and `/sys` trees for the
//! built-in resolvers.

use super::filesystem::MockFs;

impl MockFs {
    /// A Debian 12 virtual machine on VMware with one 20 GiB disk.
    pub fn typical_linux_host() -> Self {
        let mut fs = Self::new();

        fs.add_file(
            "/etc/os-release",
            r#"PRETTY_NAME="Debian GNU/Linux 12 (bookworm)"
NAME="Debian GNU/Linux"
VERSION_ID="12"
VERSION="12 (bookworm)"
VERSION_CODENAME=bookworm
ID=debian
HOME_URL="https://www.debian.org/"
"#,
        );
        fs.add_file("/etc/debian_version", "12.5\n");

        fs.add_file("/proc/sys/kernel/osrelease", "6.1.0-18-amd64\n");
        fs.add_file(
            "/proc/sys/kernel/version",
            "#1 SMP PREEMPT_DYNAMIC Debian 6.1.76-1 (2024-02-01)\n",
        );
        fs.add_file("/proc/sys/kernel/hostname", "web01\n");
        fs.add_file(
            "/etc/resolv.conf",
            "# generated by dhclient\nsearch example.com corp.example.com\nnameserver 10.0.0.2\n",
        );

        fs.add_file(
            "/proc/meminfo",
            "\
MemTotal:       16384000 kB
MemFree:         8192000 kB
MemAvailable:   12000000 kB
Buffers:          512000 kB
Cached:          2048000 kB
SwapTotal:       4096000 kB
SwapFree:        3072000 kB
",
        );

        let mut cpuinfo = String::new();
        for cpu in 0..4 {
            cpuinfo.push_str(&format!(
                "processor\t: {cpu}\n\
vendor_id\t: GenuineIntel\n\
model name\t: Intel(R) Xeon(R) Gold 6130 CPU @ 2.10GHz\n\
physical id\t: 0\n\
core id\t\t: {cpu}\n\
cpu cores\t: 4\n\n"
            ));
        }
        fs.add_file("/proc/cpuinfo", cpuinfo);

        fs.add_file("/proc/uptime", "266400.52 1012345.10\n");

        fs.add_block_device("sda", 41943040, "Virtual disk", "VMware");
        fs.add_block_device("loop0", 0, "", "");

        fs.add_file("/sys/class/dmi/id/sys_vendor", "VMware, Inc.\n");
        fs.add_file("/sys/class/dmi/id/product_name", "VMware Virtual Platform\n");
        fs.add_file(
            "/sys/class/dmi/id/product_serial",
            "VMware-56 4d 1b 2c 3d 4e 5f 60-71 82 93 a4 b5 c6 d7 e8\n",
        );
        fs.add_file(
            "/sys/class/dmi/id/product_uuid",
            "2c1b4d56-4e3d-605f-7182-93a4b5c6d7e8\n",
        );
        fs.add_file("/sys/class/dmi/id/bios_vendor", "Phoenix Technologies LTD\n");
        fs.add_file("/sys/class/dmi/id/bios_version", "6.00\n");

        fs.add_file("/proc/1/cgroup", "0::/init.scope\n");

        fs
    }

    /// An Ubuntu 22.04 server on physical hardware with two NVMe drives and
    /// a fully qualified hostname.
    pub fn bare_metal_host() -> Self {
        let mut fs = Self::new();

        fs.add_file(
            "/etc/os-release",
            r#"NAME="Ubuntu"
VERSION="22.04.4 LTS (Jammy Jellyfish)"
ID=ubuntu
ID_LIKE=debian
PRETTY_NAME="Ubuntu 22.04.4 LTS"
VERSION_ID="22.04"
VERSION_CODENAME=jammy
"#,
        );
        fs.add_file("/proc/sys/kernel/osrelease", "5.15.0-101-generic\n");
        fs.add_file(
            "/proc/sys/kernel/version",
            "#111-Ubuntu SMP Tue Mar 5 20:16:58 UTC 2024\n",
        );
        fs.add_file("/proc/sys/kernel/hostname", "db01.corp.internal\n");

        fs.add_file(
            "/proc/meminfo",
            "\
MemTotal:       65536000 kB
MemFree:        10240000 kB
MemAvailable:   50000000 kB
SwapTotal:             0 kB
SwapFree:              0 kB
",
        );

        let mut cpuinfo = String::new();
        for cpu in 0..8 {
            cpuinfo.push_str(&format!(
                "processor\t: {cpu}\n\
model name\t: AMD EPYC 7302 16-Core Processor\n\
physical id\t: {}\n\n",
                cpu / 4
            ));
        }
        fs.add_file("/proc/cpuinfo", cpuinfo);

        fs.add_file("/proc/uptime", "3725.00 29000.00\n");

        fs.add_block_device("nvme0n1", 1875385008, "Samsung SSD 980 PRO 1TB", "");
        fs.add_block_device("nvme1n1", 1875385008, "Samsung SSD 980 PRO 1TB", "");

        fs.add_file("/sys/class/dmi/id/sys_vendor", "Dell Inc.\n");
        fs.add_file("/sys/class/dmi/id/product_name", "PowerEdge R640\n");
        fs.add_file("/sys/class/dmi/id/bios_vendor", "Dell Inc.\n");
        fs.add_file("/sys/class/dmi/id/bios_version", "2.19.1\n");

        fs.add_file("/proc/1/cgroup", "0::/init.scope\n");

        fs
    }

    /// An Alpine container under Docker: no DMI, no block devices.
    pub fn docker_container() -> Self {
        let mut fs = Self::new();

        fs.add_file(
            "/etc/os-release",
            "NAME=\"Alpine Linux\"\nID=alpine\nVERSION_ID=3.19.1\nPRETTY_NAME=\"Alpine Linux v3.19\"\n",
        );
        fs.add_file("/proc/sys/kernel/osrelease", "6.6.12-linuxkit\n");
        fs.add_file("/proc/sys/kernel/hostname", "3f2a9c1b7d4e\n");
        fs.add_file("/proc/meminfo", "MemTotal:        8048000 kB\nMemAvailable:    6000000 kB\n");
        fs.add_file("/proc/cpuinfo", "processor\t: 0\n\nprocessor\t: 1\n");
        fs.add_file("/proc/uptime", "59.99 100.00\n");
        fs.add_file("/.dockerenv", "");
        fs.add_file(
            "/proc/1/cgroup",
            "12:cpuset:/docker/3f2a9c1b7d4e5f60718293a4b5c6d7e8\n",
        );

        fs
    }
}
