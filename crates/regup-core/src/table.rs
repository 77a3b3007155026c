//! The built-in per-package rule table.
//!
//! Pure configuration: every entry pairs a versioner with a downloader
//! built from the combinators in [`crate::extract`]. Version patterns
//! capture exactly one group; link patterns are matched, not captured,
//! where the combinator says so.

use crate::extract::html::{Attr, LinkQuery};
use crate::extract::{appveyor, github, html, regexp, template, wrap};
use crate::rule::{Rule, RuleSet};

/// The rules shipped with the tool, one entry per supported package.
///
/// # Panics
/// Panics if a package is registered twice or an entry carries a malformed
/// pattern or selector; both are configuration errors caught before any
/// network traffic.
pub fn builtin() -> RuleSet {
    let mut rules = RuleSet::new();

    rules.add(
        "7zip",
        Rule::new(
            regexp::version(
                "https://7-zip.org/download.html",
                "Download 7-Zip ([0-9][0-9]\\.[0-9][0-9])",
            ),
            template::links(
                Some("https://www.7-zip.org/a/7z{version-digits}.msi"),
                Some("https://www.7-zip.org/a/7z{version-digits}-x64.msi"),
            ),
        ),
    );
    rules.add(
        "anaconda",
        Rule::new(
            regexp::version("https://www.anaconda.com/download/", "Anaconda3-([0-9.]+)-"),
            html::href_links(
                "https://www.anaconda.com/download/",
                "a[href*='Anaconda3-'][href$='-Windows-x86.exe']",
                Some("a[href*='Anaconda3-'][href$='-Windows-x86_64.exe']"),
            ),
        ),
    );
    rules.add(
        "android-studio-ide",
        Rule::new(
            regexp::version(
                "https://developer.android.com/studio/",
                "install/([0-9.]+)/android-studio-ide-",
            ),
            html::href_links(
                "https://developer.android.com/studio/",
                "a[href*='android-studio-ide'][href$='-windows.exe'].button.devsite-dialog-button",
                None,
            ),
        ),
    );
    rules.add(
        "arduino",
        Rule::new(
            regexp::version("https://www.arduino.cc/en/Main/Software", "arduino-([0-9.]+)-"),
            template::links(
                Some("https://downloads.arduino.cc/arduino-{version}-windows.exe"),
                None,
            ),
        ),
    );
    rules.add(
        "audacity",
        Rule::new(
            regexp::version(
                "http://www.oldfoss.com/Audacity.html",
                "audacity-win-([0-9.]+)\\.exe",
            ),
            regexp::links(
                "http://www.oldfoss.com/Audacity.html",
                Some("\"(http.+audacity-win-{version}\\.exe)\""),
                None,
            ),
        ),
    );
    rules.add(
        "bcc",
        Rule::new(
            github::release_version("wormt/bcc", "(.+)"),
            github::release_links(
                "wormt/bcc",
                Some("bcc-.+-32bit\\.zip"),
                Some("bcc-.+-64bit\\.zip"),
            ),
        ),
    );
    rules.add(
        "bcuninstaller",
        Rule::new(
            github::release_version("Klocman/Bulk-Crap-Uninstaller", "v(.+)"),
            github::release_links("Klocman/Bulk-Crap-Uninstaller", Some(".*setup\\.exe"), None),
        ),
    );
    rules.add(
        "bitpay",
        Rule::new(
            github::release_version("bitpay/copay", "v(.+)"),
            github::release_links("bitpay/copay", Some("BitPay\\.exe"), None),
        ),
    );
    rules.add(
        "bleachbit",
        Rule::new(
            regexp::version(
                "https://www.bleachbit.org/download/windows",
                "BleachBit-([0-9.]+)-setup\\.exe",
            ),
            template::links(
                Some("https://download.bleachbit.org/BleachBit-{version}-setup.exe"),
                None,
            ),
        ),
    );
    rules.add(
        "bootnext",
        Rule::new(
            appveyor::branch_version("geek1011/bootnext", "master"),
            appveyor::artifacts("geek1011/bootnext", None, Some("bootnext\\.msi")),
        ),
    );
    rules.add(
        "brackets",
        Rule::new(
            github::release_version("adobe/brackets", "release-(.+)"),
            github::release_links("adobe/brackets", Some("Brackets\\.Release.*\\.msi"), None),
        ),
    );
    rules.add(
        "ccleaner",
        Rule::new(
            wrap::map_version(
                regexp::version(
                    "https://www.ccleaner.com/ccleaner/download/standard",
                    "ccsetup([0-9]+)",
                ),
                split_leading_digit,
            ),
            html::href_links(
                "https://www.ccleaner.com/ccleaner/download/standard",
                "a[href^='https://download.ccleaner.com/ccsetup'][href$='.exe']",
                None,
            ),
        ),
    );
    rules.add(
        "cdburnerxp",
        Rule::new(
            regexp::version("https://download.cdburnerxp.se/msi/", "_([0-9.]+)\\.msi"),
            html::href_links(
                "https://download.cdburnerxp.se/msi/",
                "a[href^='cdbxp_setup_'][href$='msi']:not([href*='x64'])",
                Some("a[href^='cdbxp_setup_x64'][href$='msi']"),
            ),
        ),
    );
    rules.add(
        "classic-shell",
        Rule::new(
            wrap::underscore_to_dot(regexp::version(
                "http://www.oldfoss.com/Classic-Shell.html",
                "ClassicShellSetup_([0-9_]+)",
            )),
            regexp::links(
                "http://www.oldfoss.com/Classic-Shell.html",
                Some("\"(http.+ClassicShellSetup_{version-underscores}\\.exe)\""),
                None,
            ),
        ),
    );
    rules.add(
        "clementine-player",
        Rule::new(
            github::release_version("clementine-player/Clementine", "(.+)"),
            github::release_links(
                "clementine-player/Clementine",
                Some("ClementineSetup-.*\\.exe"),
                None,
            ),
        ),
    );
    rules.add(
        "cmake",
        Rule::new(
            regexp::version("https://cmake.org/download/", "Latest Release \\(([0-9.]+)\\)"),
            html::href_links(
                "https://cmake.org/download/",
                "a[href$='-win32-x86.msi']",
                Some("a[href$='-win64-x64.msi']"),
            ),
        ),
    );
    rules.add(
        "conemu",
        Rule::new(
            github::release_version("Maximus5/ConEmu", "v(.+)"),
            github::release_links("Maximus5/ConEmu", Some("ConEmuSetup.*\\.exe"), None),
        ),
    );
    rules.add(
        "cpu-z",
        Rule::new(
            regexp::version(
                "https://www.cpuid.com/softwares/cpu-z.html",
                "Version ([0-9.]+) for [Ww]indows",
            ),
            template::links(
                Some("http://download.cpuid.com/cpu-z/cpu-z_{version}-en.exe"),
                None,
            ),
        ),
    );
    rules.add(
        "cryptomator",
        Rule::new(
            html::version(
                "https://cryptomator.org/downloads",
                "meta[itemprop='softwareVersion']",
                Attr::Named("content"),
                None,
            ),
            html::links(
                "https://cryptomator.org/downloads",
                None,
                Some(LinkQuery::href("#winDownload a[href$='-x64.exe']")),
            ),
        ),
    );
    rules.add(
        "cyberduck",
        Rule::new(
            regexp::version(
                "https://update.cyberduck.io/windows/?C=M;O=D",
                "Cyberduck-Installer-([0-9.]+)\\.msi",
            ),
            html::href_links(
                "https://update.cyberduck.io/windows/?C=M;O=D",
                "a[href$='.msi']",
                None,
            ),
        ),
    );
    rules.add(
        "dbeaver",
        Rule::new(
            github::release_version("dbeaver/dbeaver", "(.+)"),
            github::release_links(
                "dbeaver/dbeaver",
                Some("dbeaver-ce-.+-x86-setup\\.exe"),
                Some("dbeaver-ce-.+-x86_64-setup\\.exe"),
            ),
        ),
    );
    rules.add(
        "defraggler",
        Rule::new(
            wrap::map_version(
                regexp::version(
                    "https://www.ccleaner.com/defraggler/download/standard",
                    "dfsetup([0-9]+)",
                ),
                split_leading_digit,
            ),
            html::href_links(
                "https://www.ccleaner.com/defraggler/download/standard",
                "a[href^='https://download.ccleaner.com/dfsetup'][href$='.exe']",
                None,
            ),
        ),
    );
    rules.add(
        "deluge",
        Rule::new(
            regexp::version(
                "https://dev.deluge-torrent.org/wiki/Download",
                "Latest Release: <strong>([0-9.]+)",
            ),
            template::links(
                Some("http://download.deluge-torrent.org/windows/deluge-{version}-win32-py2.7.exe"),
                None,
            ),
        ),
    );
    rules.add(
        "dependency-walker",
        Rule::new(
            regexp::version("http://www.dependencywalker.com", "Dependency Walker ([0-9.]+)"),
            template::links(
                Some("http://www.dependencywalker.com/depends{version-digits}_x86.zip"),
                Some("http://www.dependencywalker.com/depends{version-digits}_x64.zip"),
            ),
        ),
    );
    rules.add(
        "deskpins",
        Rule::new(
            regexp::version("https://efotinis.neocities.org/deskpins/", "v([0-9.]+)"),
            html::href_links(
                "https://efotinis.neocities.org/deskpins/",
                "a[href*='DeskPins-'][href$='-setup.exe']",
                None,
            ),
        ),
    );
    rules.add(
        "ditto",
        Rule::new(
            regexp::version(
                "http://ditto-cp.sourceforge.net/index.php",
                "versionDots ?= ?\"([0-9.]+)\"",
            ),
            template::links(
                Some("https://sourceforge.net/projects/ditto-cp/files/Ditto/{version}/DittoSetup_{version-underscores}.exe/download"),
                Some("https://sourceforge.net/projects/ditto-cp/files/Ditto/{version}/DittoSetup_64bit_{version-underscores}.exe/download"),
            ),
        ),
    );
    rules.add(
        "doublecmd",
        Rule::new(
            regexp::version(
                "https://sourceforge.net/p/doublecmd/wiki/Download/",
                "doublecmd-([0-9.]+)\\.",
            ),
            html::href_links(
                "https://sourceforge.net/p/doublecmd/wiki/Download/",
                "a[href$='i386-win32.msi/download']",
                Some("a[href$='x86_64-win64.msi/download']"),
            ),
        ),
    );
    rules.add(
        "duck",
        Rule::new(
            regexp::version("https://dist.duck.sh/?C=M;O=D", "duck-([0-9.]+)\\.msi"),
            html::href_links("https://dist.duck.sh/?C=M;O=D", "a[href$='.msi']", None),
        ),
    );
    rules.add(
        "eig",
        Rule::new(
            github::release_version("EvilInsultGenerator/c-sharp-desktop", "v(.+)"),
            github::release_links(
                "EvilInsultGenerator/c-sharp-desktop",
                Some("EvilInsultGenerator_Setup\\.exe"),
                None,
            ),
        ),
    );
    rules.add(
        "enpass",
        Rule::new(
            html::version(
                "https://www.enpass.io/downloads/",
                "a[href*='Enpass_'][href$='_Setup.exe']",
                Attr::Named("href"),
                Some("Enpass_([0-9.]+)_"),
            ),
            html::href_links(
                "https://www.enpass.io/downloads/",
                "a[href*='Enpass_'][href$='_Setup.exe']",
                None,
            ),
        ),
    );
    rules.add(
        "erlang",
        Rule::new(
            regexp::version(
                "https://www.erlang.org/downloads/",
                "DOWNLOAD\\s+OTP\\s+([0-9.]+)",
            ),
            html::href_links(
                "https://www.erlang.org/downloads/",
                "a[href*='win32'][href$='exe']",
                Some("a[href*='win64'][href$='exe']"),
            ),
        ),
    );
    rules.add(
        "etcher",
        Rule::new(
            github::release_version("resin-io/etcher", "v(.+)"),
            github::release_links(
                "resin-io/etcher",
                Some("Etcher-Setup-.+-x86\\.exe"),
                Some("Etcher-Setup-.+-x64\\.exe"),
            ),
        ),
    );
    rules.add(
        "everything-search",
        Rule::new(
            regexp::version(
                "https://www.voidtools.com/downloads/",
                "Download Everything ([0-9.]+)",
            ),
            html::href_links(
                "https://www.voidtools.com/downloads/",
                "a[href$='x86-Setup.exe']",
                Some("a[href$='x64-Setup.exe']"),
            ),
        ),
    );
    rules.add(
        "filezilla-server",
        Rule::new(
            wrap::underscore_to_dot(html::version(
                "https://download.filezilla-project.org/server/?C=M;O=D",
                "a[href*='FileZilla_Server-'][href$='.exe']",
                Attr::Named("href"),
                Some("FileZilla_Server-([0-9_]+)"),
            )),
            html::href_links(
                "https://download.filezilla-project.org/server/?C=M;O=D",
                "a[href*='FileZilla_Server-'][href$='.exe']",
                None,
            ),
        ),
    );
    rules.add(
        "flash-player",
        Rule::new(
            regexp::version(
                "http://get.adobe.com/flashplayer/about/",
                "PPAPI</td>\\s*<td>([0-9.]+)",
            ),
            template::links(
                Some("https://fpdownload.macromedia.com/get/flashplayer/pdc/{version}/install_flash_player_{version-major}_plugin.msi"),
                None,
            ),
        ),
    );
    rules.add(
        "flash-player-ie",
        Rule::new(
            regexp::version(
                "http://get.adobe.com/flashplayer/about/",
                "ActiveX</td>\\s*<td>([0-9.]+)",
            ),
            template::links(
                Some("https://fpdownload.macromedia.com/get/flashplayer/pdc/{version}/install_flash_player_{version-major}_active_x.msi"),
                None,
            ),
        ),
    );
    rules.add(
        "freefilesync",
        Rule::new(
            regexp::version(
                "https://www.freefilesync.org/download.php",
                "Download FreeFileSync ([0-9.]+)",
            ),
            html::href_links(
                "https://www.freefilesync.org/download.php",
                "a.direct-download-link[href$='.exe']",
                None,
            ),
        ),
    );
    rules.add(
        "freeplane",
        Rule::new(
            regexp::version(
                "https://sourceforge.net/projects/freeplane/files/freeplane%20stable/",
                "Freeplane-Setup-([0-9.]+)\\.exe",
            ),
            template::links(
                Some("https://sourceforge.net/projects/freeplane/files/freeplane%20stable/Freeplane-Setup-{version}.exe/download"),
                None,
            ),
        ),
    );
    rules.add(
        "geforce-experience",
        Rule::new(
            regexp::version(
                "https://www.nvidia.com/en-us/geforce/geforce-experience/",
                "https://us\\.download\\.nvidia\\.com/GFE/GFEClient/([0-9.]+)/GeForce_Experience",
            ),
            html::href_links(
                "https://www.nvidia.com/en-us/geforce/geforce-experience/",
                "a[href^='https://us.download.nvidia.com/GFE/GFEClient/'][href$='.exe']",
                None,
            ),
        ),
    );
    rules.add(
        "gimp",
        Rule::new(
            regexp::version(
                "https://www.gimp.org/downloads/",
                "current stable release of GIMP is <b>([0-9.]+)",
            ),
            html::href_links(
                "https://www.gimp.org/downloads/",
                "#win a[href*='-setup'][href$='.exe']",
                None,
            ),
        ),
    );
    rules.add(
        "git",
        Rule::new(
            github::release_version("git-for-windows/git", "v([0-9.]+)\\.windows.+"),
            github::release_links(
                "git-for-windows/git",
                Some("Git-.+-32-bit\\.exe"),
                Some("Git-.+-64-bit\\.exe"),
            ),
        ),
    );
    rules.add(
        "git-credential-manager-for-windows",
        Rule::new(
            github::release_version("Microsoft/Git-Credential-Manager-for-Windows", "(.+)"),
            github::release_links(
                "Microsoft/Git-Credential-Manager-for-Windows",
                Some("GCMW-.+\\.exe"),
                None,
            ),
        ),
    );
    rules.add(
        "git-lfs",
        Rule::new(
            github::release_version("git-lfs/git-lfs", "v(.+)"),
            github::release_links("git-lfs/git-lfs", Some("git-lfs-windows-v.+\\.exe"), None),
        ),
    );
    rules.add(
        "gitextensions",
        Rule::new(
            github::release_version("gitextensions/gitextensions", "v(.+)"),
            github::release_links(
                "gitextensions/gitextensions",
                Some("GitExtensions-.*\\.msi"),
                None,
            ),
        ),
    );
    rules.add(
        "go",
        Rule::new(
            regexp::version("https://golang.org/dl/", "go([0-9.]+)\\.windows"),
            template::links(
                Some("https://dl.google.com/go/go{version}.windows-386.msi"),
                Some("https://dl.google.com/go/go{version}.windows-amd64.msi"),
            ),
        ),
    );
    rules.add(
        "gog-galaxy",
        Rule::new(
            regexp::version("https://www.gog.com/galaxy", "setup_galaxy_([0-9.]+)\\.exe"),
            html::href_links(
                "https://www.gog.com/galaxy",
                "a[href*='setup_galaxy_'][href$='.exe']",
                None,
            ),
        ),
    );
    rules.add(
        "gow",
        Rule::new(
            github::release_version("bmatzelle/gow", "v(.+)"),
            github::release_links("bmatzelle/gow", Some("Gow-.+\\.exe"), None),
        ),
    );
    rules.add(
        "greenshot",
        Rule::new(
            github::release_version("greenshot/greenshot", "Greenshot-RELEASE-([0-9.]+)"),
            github::release_links(
                "greenshot/greenshot",
                Some("Greenshot-INSTALLER-.+-RELEASE\\.exe"),
                None,
            ),
        ),
    );
    rules.add(
        "gvim",
        Rule::new(
            regexp::version(
                "https://www.vim.org/download.php",
                "latest version \\(currently ([0-9.]+)\\)",
            ),
            html::href_links(
                "http://ftp.vim.org/pub/vim/pc/?C=M;O=D",
                "a[href*='gvim'][href$='.exe']",
                None,
            ),
        ),
    );
    rules.add(
        "hashcheck",
        Rule::new(
            github::release_version("gurnec/HashCheck", "v(.+)"),
            github::release_links("gurnec/HashCheck", Some("HashCheckSetup-.+\\.exe"), None),
        ),
    );
    rules.add(
        "heidisql",
        Rule::new(
            regexp::version("https://www.heidisql.com/download.php", "HeidiSQL_([0-9.]+)_"),
            html::href_links(
                "https://www.heidisql.com/download.php",
                "a[href$='Setup.exe']",
                None,
            ),
        ),
    );
    rules.add(
        "hexchat",
        Rule::new(
            regexp::version("https://hexchat.github.io/downloads.html", "HexChat ([0-9.]+)"),
            html::href_links(
                "https://hexchat.github.io/downloads.html",
                "a[href$='x86.exe']",
                Some("a[href$='x64.exe']"),
            ),
        ),
    );
    rules.add(
        "hugo",
        Rule::new(
            github::release_version("gohugoio/hugo", "v(.+)"),
            github::release_links(
                "gohugoio/hugo",
                Some("hugo_.+_Windows-32bit\\.zip"),
                Some("hugo_.+_Windows-64bit\\.zip"),
            ),
        ),
    );
    rules.add(
        "imageglass",
        Rule::new(
            github::release_version("d2phap/ImageGlass", "([0-9.]+)"),
            github::release_links("d2phap/ImageGlass", Some("ImageGlass_.+\\.exe"), None),
        ),
    );
    rules.add(
        "inkscape",
        Rule::new(
            regexp::version("https://inkscape.org/en/release/", "Download Inkscape ([0-9.]+)"),
            template::links(
                Some("https://media.inkscape.org/dl/resources/file/inkscape-{version}-x86.msi"),
                Some("https://media.inkscape.org/dl/resources/file/inkscape-{version}-x64.msi"),
            ),
        ),
    );
    rules.add(
        "jre",
        Rule::new(
            wrap::map_version(
                regexp::version(
                    "https://www.java.com/en/download/manual.jsp",
                    "Recommended Version ([0-9]* Update [0-9]*)",
                ),
                |version| version.replacen(" Update ", ".", 1),
            ),
            html::href_links(
                "https://www.java.com/en/download/manual.jsp",
                "a[title='Download Java software for Windows Offline']",
                Some("a[title='Download Java software for Windows (64-bit)']"),
            ),
        ),
    );
    rules.add(
        "keepass",
        Rule::new(
            regexp::version(
                "https://sourceforge.net/projects/keepass/files/",
                "KeePass-([0-9.]+)\\.",
            ),
            template::links(
                Some("https://sourceforge.net/projects/keepass/files/KeePass%202.x/{version}/KeePass-{version}.msi/download"),
                None,
            ),
        ),
    );
    rules.add(
        "keepassxc",
        Rule::new(
            github::release_version("keepassxreboot/keepassxc", "([0-9.]+)"),
            github::release_links(
                "keepassxreboot/keepassxc",
                Some("KeePassXC-.+-Win32\\.msi"),
                Some("KeePassXC-.+-Win64\\.msi"),
            ),
        ),
    );
    rules.add(
        "keeweb",
        Rule::new(
            github::release_version("keeweb/keeweb", "v(.+)"),
            github::release_links(
                "keeweb/keeweb",
                Some("KeeWeb-.+\\.win\\.ia32\\.exe"),
                Some("KeeWeb-.+\\.win\\.x64\\.exe"),
            ),
        ),
    );
    rules.add(
        "kodi",
        Rule::new(
            regexp::version(
                "http://mirrors.kodi.tv/releases/windows/win32/?C=M&O=D",
                "kodi-([0-9.]+)-",
            ),
            html::href_links(
                "http://mirrors.kodi.tv/releases/windows/win32/?C=M&O=D",
                "a[href*='kodi'][href$='-x86.exe']",
                None,
            ),
        ),
    );
    rules.add(
        "krita",
        Rule::new(
            regexp::version(
                "https://krita.org/en/download/krita-desktop/",
                "krita-x86-([0-9.]+)-",
            ),
            html::href_links(
                "https://krita.org/en/download/krita-desktop/",
                "a[href*='krita-x86'][href$='.exe']",
                Some("a[href*='krita-x64'][href$='.exe']"),
            ),
        ),
    );
    rules.add(
        "libreoffice",
        Rule::new(
            regexp::version(
                "https://www.libreoffice.org/download/libreoffice-fresh/?type=win-x86&lang=en-US",
                "LibreOffice ([0-9.]+) ",
            ),
            template::links(
                Some("https://download.documentfoundation.org/libreoffice/stable/{version}/win/x86/LibreOffice_{version}_Win_x86.msi"),
                Some("https://download.documentfoundation.org/libreoffice/stable/{version}/win/x86_64/LibreOffice_{version}_Win_x64.msi"),
            ),
        ),
    );
    rules.add(
        "lockhunter",
        Rule::new(
            regexp::version("http://lockhunter.com/download.htm", "Version: ([0-9.]+)"),
            template::links(
                Some("http://lockhunter.com/exe/lockhuntersetup_{version-dashes}.exe"),
                None,
            ),
        ),
    );
    rules.add(
        "marktext",
        Rule::new(
            github::release_version("marktext/marktext", "v(.+)"),
            github::release_links("marktext/marktext", Some("marktext-setup-.+\\.exe"), None),
        ),
    );
    rules.add(
        "mercurial",
        Rule::new(
            regexp::version(
                "https://www.mercurial-scm.org/sources.js",
                "windows/mercurial-([0-9.]+)-",
            ),
            regexp::links(
                "https://www.mercurial-scm.org/sources.js",
                Some("(https://www\\.mercurial-scm\\.org/release/windows/mercurial-[0-9.]+-x86\\.msi)"),
                Some("(https://www\\.mercurial-scm\\.org/release/windows/mercurial-[0-9.]+-x64\\.msi)"),
            ),
        ),
    );
    rules.add(
        "mono",
        Rule::new(
            regexp::version(
                "http://www.mono-project.com/download/stable/",
                "[0-9.]+ Stable \\(([0-9.]+)\\)",
            ),
            html::href_links(
                "http://www.mono-project.com/download/stable/",
                "a[href*='download.mono-project.com'][href*='windows-installer'][href$='.msi']:not([href*='gtksharp'])",
                None,
            ),
        ),
    );
    rules.add(
        "mountainduck",
        Rule::new(
            regexp::version("https://mountainduck.io/", "Installer-([0-9.]+)\\.exe"),
            html::href_links(
                "https://mountainduck.io/",
                "a[href*='Installer'][href$='.msi']",
                None,
            ),
        ),
    );
    rules.add(
        "mp3tag",
        Rule::new(
            regexp::version("https://www.mp3tag.de/en/download.html", "Mp3tag v([0-9.a-z]+)"),
            html::href_links(
                "https://www.mp3tag.de/en/dodownload.html",
                "a[href*='download'][href$='.exe']",
                None,
            ),
        ),
    );
    rules.add(
        "mpc-hc",
        Rule::new(
            regexp::version("https://mpc-hc.org/downloads/", "latest stable build is v([0-9.]+)"),
            html::href_links(
                "https://mpc-hc.org/downloads/",
                "a[href$='.x86.exe']",
                Some("a[href$='.x64.exe']"),
            ),
        ),
    );
    rules.add(
        "mumble",
        Rule::new(
            github::release_version("mumble-voip/mumble", "([0-9.]+)"),
            github::release_links("mumble-voip/mumble", Some("mumble-.+\\.msi"), None),
        ),
    );
    rules.add(
        "naps2",
        Rule::new(
            github::release_version("cyanfish/naps2", "v(.+)"),
            github::release_links("cyanfish/naps2", Some("naps2-.+-setup\\.msi"), None),
        ),
    );
    rules.add(
        "nextcloud",
        Rule::new(
            regexp::version(
                "https://download.nextcloud.com/desktop/releases/Windows/?C=M;O=D",
                "Nextcloud-([0-9.]+)-",
            ),
            html::href_links(
                "https://download.nextcloud.com/desktop/releases/Windows/?C=M;O=D",
                "a[href$='setup.exe']",
                None,
            ),
        ),
    );
    rules.add(
        "notepad++",
        Rule::new(
            regexp::version(
                "https://notepad-plus-plus.org/download/",
                "Download Notepad\\+\\+ ([0-9.]+)",
            ),
            html::href_links(
                "https://notepad-plus-plus.org/download/",
                "a[href*='npp'][href$='nstaller.exe']",
                Some("a[href*='npp'][href$='nstaller.x64.exe']"),
            ),
        ),
    );
    rules.add(
        "notepad2-mod",
        Rule::new(
            github::release_version("XhmikosR/notepad2-mod", "([0-9.]+)"),
            github::release_links("XhmikosR/notepad2-mod", Some("Notepad2-mod\\..+\\.exe"), None),
        ),
    );
    rules.add(
        "npackd",
        Rule::new(
            github::release_version("tim-lebedkov/npackd-cpp", "version_([0-9.]+)"),
            github::release_links(
                "tim-lebedkov/npackd-cpp",
                Some("Npackd32-.+\\.msi"),
                Some("Npackd64-.+\\.msi"),
            ),
        ),
    );
    rules.add(
        "npackdcl",
        Rule::new(
            github::release_version("tim-lebedkov/npackd-cpp", "version_([0-9.]+)"),
            github::release_links("tim-lebedkov/npackd-cpp", Some("NpackdCL-.+\\.msi"), None),
        ),
    );
    rules.add(
        "nxlog",
        Rule::new(
            regexp::version(
                "https://nxlog.co/products/nxlog-community-edition/download",
                "nxlog-ce-([0-9.]+)\\.msi",
            ),
            html::href_links(
                "https://nxlog.co/products/nxlog-community-edition/download",
                "a[href*='nxlog-ce-'][href$='.msi']",
                None,
            ),
        ),
    );
    rules.add(
        "obs-studio",
        Rule::new(
            regexp::version("https://obsproject.com/download", "Version: ([0-9.]+)"),
            html::href_links(
                "https://obsproject.com/download",
                "a[href*='OBS-Studio-'][href$='Full-Installer-x64.exe']",
                None,
            ),
        ),
    );
    rules.add(
        "octave",
        Rule::new(
            regexp::version(
                "https://ftp.gnu.org/gnu/octave/windows/?C=M;O=D",
                "octave-([0-9.]+)-w32-installer\\.exe",
            ),
            html::href_links(
                "https://ftp.gnu.org/gnu/octave/windows/?C=M;O=D",
                "a[href*='octave-'][href$='-w32-installer.exe']",
                Some("a[href*='octave-'][href$='-w64-installer.exe']"),
            ),
        ),
    );
    rules.add(
        "open-hardware-monitor",
        Rule::new(
            regexp::version(
                "http://openhardwaremonitor.org/downloads/",
                "Open Hardware Monitor ([0-9.]+)",
            ),
            html::href_links(
                "http://openhardwaremonitor.org/downloads/",
                "a[href*='openhardwaremonitor-'][href$='.zip']",
                None,
            ),
        ),
    );
    rules.add(
        "openssh",
        Rule::new(
            regexp::version("https://www.mls-software.com/opensshd.html", "OpenSSH ([0-9.]+)p"),
            html::href_links(
                "https://www.mls-software.com/opensshd.html",
                "a[href*='setupssh-'][href$='.exe']",
                None,
            ),
        ),
    );
    rules.add(
        "perl",
        Rule::new(
            html::version(
                "http://strawberryperl.com/releases.html",
                "a[href*='strawberry-perl-'][href$='32bit.msi']",
                Attr::Named("href"),
                Some("strawberry-perl-([0-9.]+)-"),
            ),
            html::href_links(
                "http://strawberryperl.com/releases.html",
                "a[href*='strawberry-perl-'][href$='32bit.msi']",
                Some("a[href*='strawberry-perl-'][href$='64bit.msi']"),
            ),
        ),
    );
    rules.add(
        "pia",
        Rule::new(
            regexp::version(
                "https://www.privateinternetaccess.com/pages/downloads",
                "v([0-9]+)",
            ),
            html::href_links(
                "https://www.privateinternetaccess.com/pages/downloads",
                "a[href*='pia-'][href$='installer-win.exe']",
                None,
            ),
        ),
    );
    rules.add(
        "plex-media-server",
        Rule::new(
            regexp::version("https://plex.tv/api/downloads/1.json", "version\":\"([0-9.]+)"),
            regexp::links(
                "https://plex.tv/api/downloads/1.json",
                Some("\"(https://downloads\\.plex\\.tv/plex-media-server/[0-9a-z.-]+?/Plex-Media-Server-[0-9a-z.-]+?\\.exe)\""),
                None,
            ),
        ),
    );
    rules.add(
        "powershell-core",
        Rule::new(
            github::release_version("PowerShell/PowerShell", "v(.+)"),
            github::release_links(
                "PowerShell/PowerShell",
                Some("PowerShell-.+-win-x86\\.msi"),
                Some("PowerShell-.+-win-x64\\.msi"),
            ),
        ),
    );
    rules.add(
        "processhacker",
        Rule::new(
            github::release_version("processhacker/processhacker", "v(.+)"),
            github::release_links(
                "processhacker/processhacker",
                Some("processhacker-.+-setup\\.exe"),
                None,
            ),
        ),
    );
    rules.add(
        "putty",
        Rule::new(
            regexp::version(
                "http://www.chiark.greenend.org.uk/~sgtatham/putty/latest.html",
                "latest release \\(([0-9.]+)\\)",
            ),
            html::href_links(
                "http://www.chiark.greenend.org.uk/~sgtatham/putty/latest.html",
                "span.downloadfile a[href^='https'][href*='w32/putty'][href$='.msi']",
                Some("span.downloadfile a[href^='https'][href*='w64/putty'][href$='.msi']"),
            ),
        ),
    );
    rules.add(
        "pycharm-community",
        Rule::new(
            regexp::version(
                "https://data.services.jetbrains.com/products/releases?code=PCP%2CPCC&latest=true",
                "version\":\"([0-9.]+)",
            ),
            regexp::links(
                "https://data.services.jetbrains.com/products/releases?code=PCP%2CPCC&latest=true",
                Some("\"(https://download\\.jetbrains\\.com/python/pycharm-community-[0-9.]+\\.exe)\""),
                None,
            ),
        ),
    );
    rules.add(
        "python2-win32",
        Rule::new(
            github::release_version("mhammond/pywin32", "b(.+)"),
            github::release_links(
                "mhammond/pywin32",
                Some("pywin32-.+\\.win32-py2\\.7\\.exe"),
                Some("pywin32-.+\\.win-amd64-py2\\.7\\.exe"),
            ),
        ),
    );
    rules.add(
        "python3",
        Rule::new(
            html::version(
                "https://www.python.org/downloads/",
                ".download-for-current-os .download-os-windows a[href*='python-3']",
                Attr::Text,
                Some("Download Python ([0-9.]+)"),
            ),
            template::links(
                Some("https://www.python.org/ftp/python/{version}/python-{version}.exe"),
                Some("https://www.python.org/ftp/python/{version}/python-{version}-amd64.exe"),
            ),
        ),
    );
    rules.add(
        "qbittorrent",
        Rule::new(
            regexp::version(
                "http://www.oldfoss.com/qBittorrent.html",
                "qbittorrent_([0-9.]+)_setup\\.exe",
            ),
            regexp::links(
                "http://www.oldfoss.com/qBittorrent.html",
                Some("\"(http.+qbittorrent_{version}_setup\\.exe)\""),
                Some("\"(http.+qbittorrent_{version}_x64_setup\\.exe)\""),
            ),
        ),
    );
    rules.add(
        "qtox",
        Rule::new(
            github::release_version("qTox/qTox", "v(.+)"),
            github::release_links(
                "qTox/qTox",
                Some("setup-qtox-i686-release\\.exe"),
                Some("setup-qtox-x86_64-release\\.exe"),
            ),
        ),
    );
    rules.add(
        "recuva",
        Rule::new(
            wrap::map_version(
                regexp::version(
                    "https://www.ccleaner.com/recuva/download/standard",
                    "rcsetup([0-9]+)",
                ),
                split_leading_digit,
            ),
            html::href_links(
                "https://www.ccleaner.com/recuva/download/standard",
                "a[href^='https://download.ccleaner.com/rcsetup'][href$='.exe']",
                None,
            ),
        ),
    );
    rules.add(
        "retroarch",
        Rule::new(
            regexp::version(
                "https://www.retroarch.com/?page=platforms",
                "https://buildbot\\.libretro\\.com/stable/([0-9.]+)/windows/",
            ),
            html::href_links(
                "https://www.retroarch.com/?page=platforms",
                "a[href*='/x86/'][href$='.exe']",
                Some("a[href*='/x86_64/'][href$='.exe']"),
            ),
        ),
    );
    rules.add(
        "ruby",
        Rule::new(
            github::release_version("oneclick/rubyinstaller2", "rubyinstaller-([0-9.]+)"),
            github::release_links(
                "oneclick/rubyinstaller2",
                Some("rubyinstaller-[0-9.]+-.+-x86\\.exe"),
                Some("rubyinstaller-[0-9.]+-.+-x64\\.exe"),
            ),
        ),
    );
    rules.add(
        "seafile-client",
        Rule::new(
            wrap::insecure_version(html::version(
                "https://www.seafile.com/en/download/",
                "a.download-op[href*='seafile'][href$='en.msi']",
                Attr::Text,
                Some("([0-9.]+)"),
            )),
            wrap::insecure_download(html::href_links(
                "https://www.seafile.com/en/download/",
                "a.download-op[href*='seafile'][href$='en.msi']",
                None,
            )),
        ),
    );
    rules.add(
        "sharex",
        Rule::new(
            github::release_version("ShareX/ShareX", "v(.+)"),
            github::release_links("ShareX/ShareX", Some("ShareX-.+-setup\\.exe"), None),
        ),
    );
    rules.add(
        "sharpkeys",
        Rule::new(
            github::release_version("randyrants/sharpkeys", "v(.+)"),
            github::release_links("randyrants/sharpkeys", Some("sharpkeys.+\\.msi"), None),
        ),
    );
    rules.add(
        "signal",
        Rule::new(
            regexp::version(
                "https://updates.signal.org/desktop/latest.yml",
                "version: ([0-9.]+)",
            ),
            template::links(
                Some("https://updates.signal.org/desktop/signal-desktop-win-{version}.exe"),
                None,
            ),
        ),
    );
    rules.add(
        "simplenote",
        Rule::new(
            github::release_version("Automattic/simplenote-electron", "v(.+)"),
            github::release_links(
                "Automattic/simplenote-electron",
                Some("Simplenote-win-[0-9.]+\\.exe"),
                None,
            ),
        ),
    );
    rules.add(
        "smplayer",
        Rule::new(
            regexp::version(
                "https://sourceforge.net/projects/smplayer/files/",
                "smplayer-([0-9.]+)\\.",
            ),
            template::links(
                Some("https://sourceforge.net/projects/smplayer/files/SMPlayer/{version}/smplayer-{version}-win32.exe/download"),
                Some("https://sourceforge.net/projects/smplayer/files/SMPlayer/{version}/smplayer-{version}-x64.exe/download"),
            ),
        ),
    );
    rules.add(
        "sourcetree",
        Rule::new(
            regexp::version("https://www.sourcetreeapp.com", "SourceTreeSetup-([0-9.]+)\\.exe"),
            html::href_links(
                "https://www.sourcetreeapp.com",
                "a[href*='SourceTreeSetup'][href$='exe']",
                None,
            ),
        ),
    );
    rules.add(
        "sublime-text",
        Rule::new(
            regexp::version("https://www.sublimetext.com/2", "Version:</i> ([0-9.]+)"),
            html::href_links(
                "https://www.sublimetext.com/2",
                "#dl_win_32 a[href$='exe']",
                Some("#dl_win_64 a[href$='exe']"),
            ),
        ),
    );
    rules.add(
        "sublime-text-3",
        Rule::new(
            regexp::version("https://www.sublimetext.com/3", "Version:</i> Build ([0-9]+)"),
            html::href_links(
                "https://www.sublimetext.com/3",
                "#dl_win_32 a[href$='exe']",
                Some("#dl_win_64 a[href$='exe']"),
            ),
        ),
    );
    rules.add(
        "sublime-text-dev",
        Rule::new(
            regexp::version("https://www.sublimetext.com/3dev", "Version:</i> Build ([0-9]+)"),
            html::href_links(
                "https://www.sublimetext.com/3dev",
                "#dl_win_32 a[href$='exe']",
                Some("#dl_win_64 a[href$='exe']"),
            ),
        ),
    );
    rules.add(
        "sumatrapdf",
        Rule::new(
            regexp::version("https://www.sumatrapdfreader.org/news.html", ">([0-9.]+) \\(20"),
            template::links(
                Some("https://www.sumatrapdfreader.org/dl/SumatraPDF-{version}-install.exe"),
                Some("https://www.sumatrapdfreader.org/dl/SumatraPDF-{version}-64-install.exe"),
            ),
        ),
    );
    rules.add(
        "syncthing",
        Rule::new(
            github::release_version("syncthing/syncthing", "v(.+)"),
            github::release_links(
                "syncthing/syncthing",
                Some(".*windows-386.*\\.zip"),
                Some(".*windows-amd64.*\\.zip"),
            ),
        ),
    );
    rules.add(
        "teamspeak",
        Rule::new(
            regexp::version(
                "https://www.teamspeak.com/en/downloads",
                "Client-win32-([0-9.]+)\\.exe",
            ),
            html::links(
                "https://www.teamspeak.com/en/downloads",
                Some(LinkQuery::new(
                    "option[value*='win32'][value$='.exe']",
                    Attr::Named("value"),
                )),
                Some(LinkQuery::new(
                    "option[value*='win64'][value$='.exe']",
                    Attr::Named("value"),
                )),
            ),
        ),
    );
    rules.add(
        "tightvnc",
        Rule::new(
            regexp::version("https://tightvnc.com/download.php", "Version ([0-9.]+)"),
            html::href_links(
                "https://tightvnc.com/download.php",
                "a[href*='tightvnc-'][href$='-setup-32bit.msi']",
                Some("a[href*='tightvnc-'][href$='-setup-64bit.msi']"),
            ),
        ),
    );
    rules.add(
        "tor-browser",
        Rule::new(
            regexp::version(
                "https://www.torproject.org/download/download.html.en",
                "torbrowser-install-([0-9.]+)_en",
            ),
            html::href_links(
                "https://www.torproject.org/download/download.html.en",
                "a.button.win-tbb",
                Some("a.button.win-tbb64"),
            ),
        ),
    );
    rules.add(
        "tortoisegit",
        Rule::new(
            regexp::version("https://tortoisegit.org/download/", "TortoiseGit-([0-9.]+)"),
            html::href_links(
                "https://tortoisegit.org/download/",
                "a[href$='32bit.msi']",
                Some("a[href$='64bit.msi']"),
            ),
        ),
    );
    rules.add(
        "upx",
        Rule::new(
            github::release_version("upx/upx", "v(.+)"),
            github::release_links(
                "upx/upx",
                Some("upx-[0-9.]+-win32\\.zip"),
                Some("upx-[0-9.]+-win64\\.zip"),
            ),
        ),
    );
    rules.add(
        "vagrant",
        Rule::new(
            regexp::version("https://www.vagrantup.com/downloads.html", "vagrant_([0-9.]+)_"),
            html::href_links(
                "https://www.vagrantup.com/downloads.html",
                "a[href*='vagrant_'][href$='_i686.msi']",
                Some("a[href*='vagrant_'][href$='_x86_64.msi']"),
            ),
        ),
    );
    rules.add(
        "veracrypt",
        Rule::new(
            regexp::version(
                "https://sourceforge.net/projects/veracrypt/files/",
                "VeraCrypt_([0-9.]+)_",
            ),
            template::links(
                Some("https://sourceforge.net/projects/veracrypt/files/VeraCrypt%20{version}/VeraCrypt%20Setup%20{version}.exe/download"),
                None,
            ),
        ),
    );
    rules.add(
        "virtualbox",
        Rule::new(
            regexp::version("https://www.virtualbox.org/wiki/Downloads", "VirtualBox-([0-9.]+)-"),
            html::href_links("https://www.virtualbox.org/wiki/Downloads", "a[href$='.exe']", None),
        ),
    );
    rules.add(
        "virtualbox-extpack",
        Rule::new(
            regexp::version(
                "https://www.virtualbox.org/wiki/Downloads",
                "VirtualBox_Extension_Pack-([0-9.]+)\\.",
            ),
            html::href_links(
                "https://www.virtualbox.org/wiki/Downloads",
                "a[href$='.vbox-extpack']",
                None,
            ),
        ),
    );
    rules.add(
        "vivaldi",
        Rule::new(
            regexp::version("https://vivaldi.com/download/", "Vivaldi\\.([0-9.]+)\\.exe"),
            html::href_links(
                "https://vivaldi.com/download/",
                "a[href*='Vivaldi.'][href$='.exe']:not([href$='.x64.exe'])",
                Some("a[href*='Vivaldi.'][href$='.x64.exe']"),
            ),
        ),
    );
    rules.add(
        "vlc",
        Rule::new(
            regexp::version(
                "https://download.videolan.org/pub/videolan/vlc/last/win32/",
                "vlc-([0-9.]+)-win32\\.msi",
            ),
            template::links(
                Some("https://download.videolan.org/pub/videolan/vlc/last/win32/vlc-{version}-win32.msi"),
                Some("https://download.videolan.org/pub/videolan/vlc/last/win64/vlc-{version}-win64.msi"),
            ),
        ),
    );
    rules.add(
        "vpnunlimited",
        Rule::new(
            regexp::version(
                "https://www.vpnunlimitedapp.com/en/downloads/windows",
                "_v([0-9.]+)\\.",
            ),
            html::href_links(
                "https://www.vpnunlimitedapp.com/en/downloads/windows",
                "a[href*='VPN_Unlimited_'][href$='.exe']",
                None,
            ),
        ),
    );
    rules.add(
        "webtorrent",
        Rule::new(
            github::release_version("webtorrent/webtorrent-desktop", "v(.+)"),
            github::release_links(
                "webtorrent/webtorrent-desktop",
                Some("WebTorrentSetup-v[0-9.]+-ia32\\.exe"),
                Some("WebTorrentSetup-v[0-9.]+\\.exe"),
            ),
        ),
    );
    rules.add(
        "winrar",
        Rule::new(
            regexp::version("https://www.win-rar.com/download.html", "WinRAR ([0-9.]+) "),
            template::links(
                Some("https://rarlab.com/rar/wrar{version-digits}.exe"),
                Some("https://rarlab.com/rar/winrar-x64-{version-digits}.exe"),
            ),
        ),
    );
    rules.add(
        "winscp",
        Rule::new(
            regexp::version(
                "https://sourceforge.net/projects/winscp/files/",
                "WinSCP-([0-9.]+)-",
            ),
            template::links(
                Some("https://sourceforge.net/projects/winscp/files/WinSCP/{version}/WinSCP-{version}-Setup.exe/download"),
                None,
            ),
        ),
    );
    rules.add(
        "wireshark",
        Rule::new(
            regexp::version(
                "https://www.wireshark.org/download.html",
                "Stable Release \\(([0-9.]+)\\)",
            ),
            html::href_links(
                "https://www.wireshark.org/download.html",
                "a[href*='Wireshark-win32-'][href$='.exe']",
                Some("a[href*='Wireshark-win64-'][href$='.exe']"),
            ),
        ),
    );
    rules.add(
        "wixedit",
        Rule::new(
            github::release_version("WixEdit/WixEdit", "v([0-9]+\\.[0-9]+\\.[0-9]+)"),
            github::release_links("WixEdit/WixEdit", Some("wixedit-.+\\.msi"), None),
        ),
    );
    rules.add(
        "workflowy",
        Rule::new(
            regexp::version(
                "https://workflowy.com/downloads/windows/",
                "download/v([0-9.]+)/WorkFlowy",
            ),
            html::href_links(
                "https://workflowy.com/downloads/windows/",
                ".js--start-download[href*='Installer.exe']",
                None,
            ),
        ),
    );
    rules.add(
        "wox",
        Rule::new(
            github::release_version("Wox-launcher/Wox", "v(.+)"),
            github::release_links("Wox-launcher/Wox", Some("Wox-[0-9.]+\\.exe"), None),
        ),
    );
    rules.add(
        "ynab",
        Rule::new(
            regexp::version(
                "http://classic.youneedabudget.com/download",
                "_([0-9.]+)_Setup\\.exe",
            ),
            html::href_links(
                "http://classic.youneedabudget.com/download",
                "a[href*='YNAB'][href$='Setup.exe']",
                None,
            ),
        ),
    );
    rules.add(
        "youtube-dl",
        Rule::new(
            github::release_version("rg3/youtube-dl", "([0-9.]+)"),
            github::release_links("rg3/youtube-dl", Some("youtube-dl\\.exe"), None),
        ),
    );

    rules
}

/// `556` becomes `5.56`, the versioning used by installers named like
/// `ccsetup556.exe`.
fn split_leading_digit(version: String) -> String {
    if version.len() > 1 {
        format!("{}.{}", &version[..1], &version[1..])
    } else {
        version
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Compiles every pattern and selector in the table.
    #[test]
    fn builtin_table_constructs() {
        let rules = builtin();
        assert!(rules.len() >= 128, "table shrank to {}", rules.len());
    }

    #[test]
    fn known_entries_are_registered() {
        let rules = builtin();
        for name in [
            "7zip",
            "bcc",
            "bootnext",
            "classic-shell",
            "git-lfs",
            "greenshot",
            "kodi",
            "mono",
            "notepad++",
            "obs-studio",
            "seafile-client",
            "sublime-text-dev",
            "virtualbox-extpack",
            "youtube-dl",
        ] {
            assert!(rules.contains(name), "missing rule for {name}");
        }
        assert!(!rules.contains("not-a-package"));
    }

    #[test]
    fn split_leading_digit_formats_ccleaner_style_versions() {
        assert_eq!(split_leading_digit("556".to_string()), "5.56");
        assert_eq!(split_leading_digit("5".to_string()), "5");
    }
}
