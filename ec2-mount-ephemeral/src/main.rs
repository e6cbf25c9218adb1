fn main() -> anyhow::Result<()> {
    ec2_mount_ephemeral::run()
}
