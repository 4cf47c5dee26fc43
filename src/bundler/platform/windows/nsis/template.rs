//! Built-in templates.
//!
//! Both templates are rendered by handlebars with HTML escaping disabled and
//! strict mode on. Every `{{...}}` expression must be provided by the
//! context; values arrive pre-escaped for NSIS.

/// NSIS installer skeleton.
pub const NSI_TEMPLATE: &str = r#"; {{product_name}} {{version}} installer
; Generated by kodegen_bundler_nsis. Edits are overwritten on the next run.

Unicode true
{{compression}}

!define PRODUCT_NAME "{{product_name}}"
!define PRODUCT_VERSION "{{version}}"
{{toggles.publisher}}!define PRODUCT_PUBLISHER "{{publisher}}"
{{toggles.web_site}}!define PRODUCT_WEB_SITE "{{web_site}}"
!define PRODUCT_UNINST_KEY "Software\Microsoft\Windows\CurrentVersion\Uninstall\${PRODUCT_NAME}"
!define PRODUCT_UNINST_ROOT_KEY "HKLM"
!define /ifndef PRODUCT_PUBLISHER ""
!define /ifndef PRODUCT_WEB_SITE ""

; Optional behaviors. A leading ';' disables the line.
{{toggles.compile}}!define MISC_COMPILE "1"
{{toggles.optimize}}!define MISC_OPTIMIZE "1"
{{toggles.run_2to3}}!define MISC_2TO3 "1"
{{toggles.msvc2008}}!define MISC_MSVC2008 "1"
{{toggles.msvc2010}}!define MISC_MSVC2010 "1"
{{toggles.debug}}!define MISC_DEBUG "1"

; Package information shown on the welcome page.
{{toggles.info_description}}!define INFO_DESCRIPTION "{{info.description}}$\r$\n$\r$\n"
{{toggles.info_author}}!define INFO_AUTHOR "Author: {{info.author}}$\r$\n"
{{toggles.info_author_email}}!define INFO_AUTHOR_EMAIL "Author email: {{info.author_email}}$\r$\n"
{{toggles.info_maintainer}}!define INFO_MAINTAINER "Maintainer: {{info.maintainer}}$\r$\n"
{{toggles.info_maintainer_email}}!define INFO_MAINTAINER_EMAIL "Maintainer email: {{info.maintainer_email}}$\r$\n"
{{toggles.info_url}}!define INFO_URL "Website: {{info.url}}$\r$\n"
{{toggles.info_license}}!define INFO_LICENSE "License: {{info.license}}$\r$\n"
!define /ifndef INFO_DESCRIPTION ""
!define /ifndef INFO_AUTHOR ""
!define /ifndef INFO_AUTHOR_EMAIL ""
!define /ifndef INFO_MAINTAINER ""
!define /ifndef INFO_MAINTAINER_EMAIL ""
!define /ifndef INFO_URL ""
!define /ifndef INFO_LICENSE ""

!include "MUI2.nsh"
!include "LogicLib.nsh"
!include "Sections.nsh"
!include "FileFunc.nsh"
!include "x64.nsh"
{{toggles.nsh}}!include "{{nsh_path}}"

!macro DebugPrint text
  !ifdef MISC_DEBUG
    DetailPrint "[debug] ${text}"
  !endif
!macroend
!define DebugPrint "!insertmacro DebugPrint"

; MUI settings
!define MUI_ABORTWARNING
!define MUI_ICON "{{install_icon}}"
!define MUI_UNICON "{{uninstall_icon}}"
!define MUI_HEADERIMAGE
!define MUI_HEADERIMAGE_BITMAP "{{header_bitmap}}"
!define MUI_WELCOMEFINISHPAGE_BITMAP "{{welcome_bitmap}}"
!define MUI_WELCOMEPAGE_TEXT "Setup will install ${PRODUCT_NAME} ${PRODUCT_VERSION} into the Python installations you select.$\r$\n$\r$\n${INFO_DESCRIPTION}${INFO_AUTHOR}${INFO_AUTHOR_EMAIL}${INFO_MAINTAINER}${INFO_MAINTAINER_EMAIL}${INFO_URL}${INFO_LICENSE}$\r$\nClick Next to continue."
!define MUI_COMPONENTSPAGE_NODESC

!insertmacro MUI_PAGE_WELCOME
{{toggles.license_page}}!insertmacro MUI_PAGE_LICENSE "{{license_file}}"
!insertmacro MUI_PAGE_COMPONENTS
!insertmacro MUI_PAGE_INSTFILES
!insertmacro MUI_PAGE_FINISH

!insertmacro MUI_UNPAGE_CONFIRM
!insertmacro MUI_UNPAGE_INSTFILES

!insertmacro MUI_LANGUAGE "English"

Name "${PRODUCT_NAME} ${PRODUCT_VERSION}"
OutFile "{{installer_path}}"
RequestExecutionLevel admin
ShowInstDetails show
ShowUnInstDetails show

VIProductVersion "{{version_nsis}}"
VIAddVersionKey "ProductName" "${PRODUCT_NAME}"
VIAddVersionKey "ProductVersion" "${PRODUCT_VERSION}"
VIAddVersionKey "FileVersion" "${PRODUCT_VERSION}"
VIAddVersionKey "FileDescription" "${PRODUCT_NAME} installer"
VIAddVersionKey "CompanyName" "${PRODUCT_PUBLISHER}"
VIAddVersionKey "LegalCopyright" "${PRODUCT_PUBLISHER}"

Var PACKAGEDIR
Var SCRIPTSDIR
Var HEADERSDIR
Var PYTHONEXE
Var UNTARGET
{{#each targets}}
Var DIR_{{label}}
{{/each}}

!macro InstallFiles
{{#if package}}
{{package.install}}
{{/if}}
{{#if script}}
{{script.install}}
{{/if}}
{{#if header}}
{{header.install}}
{{/if}}
!macroend

!macro UninstallFiles
{{#if package}}
{{package.uninstall}}
{{/if}}
{{#if script}}
{{script.uninstall}}
{{/if}}
{{#if header}}
{{header.uninstall}}
{{/if}}
!macroend

!macro CheckRedist title code32 code64
  StrCpy $R1 ""
  SetRegView 32
  ReadRegStr $R1 HKLM "Software\Microsoft\Windows\CurrentVersion\Uninstall\${code32}" "DisplayName"
  ${If} $R1 == ""
  ${AndIf} ${RunningX64}
    SetRegView 64
    ReadRegStr $R1 HKLM "Software\Microsoft\Windows\CurrentVersion\Uninstall\${code64}" "DisplayName"
  ${EndIf}
  SetRegView default
  ${If} $R1 == ""
    MessageBox MB_OK|MB_ICONEXCLAMATION "The ${title} redistributable was not found. ${PRODUCT_NAME} may not work until it is installed." /SD IDOK
  ${EndIf}
!macroend

{{#each targets}}
Section /o "{{name}}" SEC_{{label}}
  StrCpy $PACKAGEDIR "{{package_dir}}"
  StrCpy $SCRIPTSDIR "{{scripts_dir}}"
  StrCpy $HEADERSDIR "{{headers_dir}}"
  StrCpy $PYTHONEXE "{{interpreter}}"
  ${DebugPrint} "{{label}}: installing into $PACKAGEDIR"
  SetOverwrite ifnewer
  !insertmacro InstallFiles
{{#if @root.postinstall}}
  {{run_2to3}}nsExec::ExecToLog '"$PYTHONEXE" "$PLUGINSDIR\postinstall.py" 2to3 "$PACKAGEDIR"'
  {{run_2to3}}Pop $0
  !ifdef MISC_COMPILE
    nsExec::ExecToLog '"$PYTHONEXE" "$PLUGINSDIR\postinstall.py" compile "$PACKAGEDIR"'
    Pop $0
  !endif
  !ifdef MISC_OPTIMIZE
    nsExec::ExecToLog '"$PYTHONEXE" -OO "$PLUGINSDIR\postinstall.py" compile "$PACKAGEDIR"'
    Pop $0
  !endif
  ${DebugPrint} "{{label}}: post-install finished with $0"
{{/if}}
  WriteUninstaller "$DIR_{{label}}\Remove${PRODUCT_NAME}.exe"
  WriteRegStr ${PRODUCT_UNINST_ROOT_KEY} "${PRODUCT_UNINST_KEY}-{{label}}" "DisplayName" "${PRODUCT_NAME} ${PRODUCT_VERSION} ({{name}})"
  WriteRegStr ${PRODUCT_UNINST_ROOT_KEY} "${PRODUCT_UNINST_KEY}-{{label}}" "UninstallString" '"$DIR_{{label}}\Remove${PRODUCT_NAME}.exe" /TARGET={{label}}'
  WriteRegStr ${PRODUCT_UNINST_ROOT_KEY} "${PRODUCT_UNINST_KEY}-{{label}}" "DisplayVersion" "${PRODUCT_VERSION}"
  WriteRegStr ${PRODUCT_UNINST_ROOT_KEY} "${PRODUCT_UNINST_KEY}-{{label}}" "Publisher" "${PRODUCT_PUBLISHER}"
  WriteRegStr ${PRODUCT_UNINST_ROOT_KEY} "${PRODUCT_UNINST_KEY}-{{label}}" "URLInfoAbout" "${PRODUCT_WEB_SITE}"
  WriteRegStr ${PRODUCT_UNINST_ROOT_KEY} "${PRODUCT_UNINST_KEY}-{{label}}" "PackageDir" "$PACKAGEDIR"
  WriteRegStr ${PRODUCT_UNINST_ROOT_KEY} "${PRODUCT_UNINST_KEY}-{{label}}" "ScriptsDir" "$SCRIPTSDIR"
  WriteRegStr ${PRODUCT_UNINST_ROOT_KEY} "${PRODUCT_UNINST_KEY}-{{label}}" "HeadersDir" "$HEADERSDIR"
SectionEnd

{{/each}}
{{#each targets}}
Function Detect_{{label}}
  StrCpy $R0 ""
{{#each probes}}
  ${If} $R0 == ""
    SetRegView {{view}}
    ReadRegStr $R0 {{hive}} "{{key}}" "{{value}}"
  ${EndIf}
{{/each}}
  SetRegView default
  ${If} $R0 != ""
  ${AndIfNot} ${FileExists} "{{presence_path}}"
    StrCpy $R0 ""
  ${EndIf}
  StrCpy $DIR_{{label}} $R0
  ${If} $R0 == ""
    SectionSetFlags {{section_ref}} ${SF_RO}
    SectionSetText {{section_ref}} "{{name}} (not found)"
  ${Else}
    SectionSetFlags {{section_ref}} ${SF_SELECTED}
  ${EndIf}
FunctionEnd

{{/each}}
Function .onInit
  InitPluginsDir
{{#if postinstall}}
  File "/oname=$PLUGINSDIR\postinstall.py" "postinstall.py"
{{/if}}
  !ifdef MISC_MSVC2008
    !insertmacro CheckRedist "Microsoft Visual C++ 2008" "{9A25302D-30C0-39D9-BD6F-21E6EC160475}" "{8220EEFE-38CD-377E-8595-13398D740ACE}"
  !endif
  !ifdef MISC_MSVC2010
    !insertmacro CheckRedist "Microsoft Visual C++ 2010" "{196BB40D-1578-3D01-B289-BEFC77A11A1E}" "{DA5E371C-6333-3D8A-93A4-6FD5B20BCC6E}"
  !endif
{{#each targets}}
  Call Detect_{{label}}
{{/each}}
FunctionEnd

Function un.onInit
  ${GetParameters} $R0
  ${GetOptions} $R0 "/TARGET=" $UNTARGET
  ${If} $UNTARGET == ""
    MessageBox MB_OK|MB_ICONSTOP "Please uninstall ${PRODUCT_NAME} from the list of installed programs." /SD IDOK
    Abort
  ${EndIf}
  ReadRegStr $PACKAGEDIR ${PRODUCT_UNINST_ROOT_KEY} "${PRODUCT_UNINST_KEY}-$UNTARGET" "PackageDir"
  ReadRegStr $SCRIPTSDIR ${PRODUCT_UNINST_ROOT_KEY} "${PRODUCT_UNINST_KEY}-$UNTARGET" "ScriptsDir"
  ReadRegStr $HEADERSDIR ${PRODUCT_UNINST_ROOT_KEY} "${PRODUCT_UNINST_KEY}-$UNTARGET" "HeadersDir"
FunctionEnd

Section Uninstall
  ${DebugPrint} "removing $UNTARGET from $PACKAGEDIR"
  !insertmacro UninstallFiles
  Delete "$INSTDIR\Remove${PRODUCT_NAME}.exe"
  DeleteRegKey ${PRODUCT_UNINST_ROOT_KEY} "${PRODUCT_UNINST_KEY}-$UNTARGET"
  SetAutoClose true
SectionEnd
"#;

/// Post-install helper run by the installer with the target's interpreter.
///
/// `compile` byte-compiles the listed sources (honoring `-OO` when the
/// interpreter runs with it); `2to3` rewrites them in place.
pub const POSTINSTALL_TEMPLATE: &str = r#"# {{product_name}} {{version}} post-install helper.
# Generated by kodegen_bundler_nsis.
import os
import sys

SOURCES = [
{{#each sources}}
    r"{{this}}",
{{/each}}
]


def main(argv):
    mode, root = argv[1], argv[2]
    paths = [os.path.join(root, source) for source in SOURCES]
    paths = [path for path in paths if os.path.exists(path)]
    if mode == "compile":
        import py_compile
        for path in paths:
            try:
                py_compile.compile(path, doraise=True)
            except py_compile.PyCompileError as err:
                sys.stderr.write("%s\n" % err)
        return 0
    if mode == "2to3":
        from lib2to3.main import main as lib2to3_main
        return lib2to3_main("lib2to3.fixes", ["-w", "-n"] + paths)
    sys.stderr.write("unknown mode %s\n" % mode)
    return 2


if __name__ == "__main__":
    sys.exit(main(sys.argv))
"#;
